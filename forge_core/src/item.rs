use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A fully generated item with all stats computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: Uuid,
    /// Display name (for rares and legendaries, this is the generated name)
    pub name: String,
    /// Base type display name
    pub base_name: String,
    pub item_type: ItemType,
    pub sub_type: Option<String>,
    pub rarity: Rarity,
    pub corrupted: bool,
    /// Inventory footprint in cells
    pub width: u32,
    pub height: u32,
    pub item_level: u32,
    pub requirements: Requirements,
    pub stackable: bool,
    pub weight: f32,
    pub affixes: AffixSet,
    pub sockets: Option<SocketData>,
    pub identified: bool,
    pub quality: u32,
    /// Lowercase template key, set on uniques only
    pub unique_id: Option<String>,
    pub flavor_text: Option<String>,
    pub legendary_effect: Option<String>,
    /// Base defenses (for armor)
    pub defenses: Defenses,
    /// Base damage (for weapons)
    pub damage: Option<WeaponDamage>,
}

impl ItemData {
    pub fn footprint(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }

    /// Count total rolled and fixed affixes
    pub fn affix_count(&self) -> usize {
        self.affixes.len()
    }

    /// Check if item can have more prefixes
    pub fn can_add_prefix(&self) -> bool {
        self.affixes.prefixes.len() < self.rarity.max_prefixes()
    }

    /// Check if item can have more suffixes
    pub fn can_add_suffix(&self) -> bool {
        self.affixes.suffixes.len() < self.rarity.max_suffixes()
    }

    pub fn can_add(&self, affix_type: AffixType) -> bool {
        match affix_type {
            AffixType::Prefix => self.can_add_prefix(),
            AffixType::Suffix => self.can_add_suffix(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Export item to markdown format
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n", self.name));
        md.push_str(&format!("**{}** ({:?})", self.base_name, self.rarity));
        if self.corrupted {
            md.push_str(" *Corrupted*");
        }
        md.push_str(&format!("\nItem Level: {}\n\n", self.item_level));

        if !self.identified {
            md.push_str("*Unidentified*\n\n");
        }

        if self.quality > 0 {
            md.push_str(&format!("Quality: +{}%\n\n", self.quality));
        }

        if self.defenses.has_any() {
            md.push_str("### Defenses\n");
            if let Some(armor) = self.defenses.armor {
                md.push_str(&format!("- Armor: {}\n", armor));
            }
            if let Some(evasion) = self.defenses.evasion {
                md.push_str(&format!("- Evasion: {}\n", evasion));
            }
            if let Some(es) = self.defenses.energy_shield {
                md.push_str(&format!("- Energy Shield: {}\n", es));
            }
            md.push('\n');
        }

        if let Some(ref dmg) = self.damage {
            md.push_str("### Damage\n");
            md.push_str(&format!("- Physical: {}-{}\n", dmg.min, dmg.max));
            if dmg.attack_speed > 0.0 {
                md.push_str(&format!("- Attack Speed: {:.2}\n", dmg.attack_speed));
            }
            if dmg.critical_chance > 0.0 {
                md.push_str(&format!("- Critical Chance: {:.1}%\n", dmg.critical_chance));
            }
            md.push('\n');
        }

        if let Some(ref sockets) = self.sockets {
            md.push_str(&format!("Sockets: {}\n\n", sockets.display()));
        }

        if !self.affixes.is_empty() {
            md.push_str("### Modifiers\n");
            for prefix in &self.affixes.prefixes {
                md.push_str(&format!("- {} (P)\n", prefix.display()));
            }
            for suffix in &self.affixes.suffixes {
                md.push_str(&format!("- {} (S)\n", suffix.display()));
            }
            md.push('\n');
        }

        if let Some(ref effect) = self.legendary_effect {
            md.push_str(&format!("**{}**\n\n", effect));
        }

        if let Some(ref flavor) = self.flavor_text {
            md.push_str(&format!("> {}\n\n", flavor));
        }

        if self.requirements.has_any() {
            let mut reqs = Vec::new();
            if self.requirements.level > 0 {
                reqs.push(format!("Level {}", self.requirements.level));
            }
            if self.requirements.strength > 0 {
                reqs.push(format!("{} Str", self.requirements.strength));
            }
            if self.requirements.dexterity > 0 {
                reqs.push(format!("{} Dex", self.requirements.dexterity));
            }
            if self.requirements.intelligence > 0 {
                reqs.push(format!("{} Int", self.requirements.intelligence));
            }
            md.push_str(&format!("*Requires: {}*\n", reqs.join(", ")));
        }

        md
    }
}

/// Defense values on an armor piece
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Defenses {
    pub armor: Option<i32>,
    pub evasion: Option<i32>,
    pub energy_shield: Option<i32>,
}

impl Defenses {
    pub fn has_any(&self) -> bool {
        self.armor.is_some() || self.evasion.is_some() || self.energy_shield.is_some()
    }
}

/// Weapon damage values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponDamage {
    pub min: i32,
    pub max: i32,
    pub attack_speed: f32,
    pub critical_chance: f32,
}

/// Prefix and suffix lists of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixSet {
    pub prefixes: Vec<Affix>,
    pub suffixes: Vec<Affix>,
}

impl AffixSet {
    pub fn len(&self) -> usize {
        self.prefixes.len() + self.suffixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.suffixes.is_empty()
    }

    /// Append to the list matching the affix's slot kind
    pub fn push(&mut self, affix: Affix) {
        match affix.affix_type {
            AffixType::Prefix => self.prefixes.push(affix),
            AffixType::Suffix => self.suffixes.push(affix),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Affix> {
        self.prefixes.iter().chain(self.suffixes.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Affix> {
        self.prefixes.iter_mut().chain(self.suffixes.iter_mut())
    }
}

/// A rolled modifier instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affix {
    pub affix_type: AffixType,
    /// Display name of the template this was rolled from
    pub name: String,
    pub stat: String,
    pub tier: u32,
    pub values: BTreeMap<String, AffixValue>,
    pub legendary: bool,
}

impl Affix {
    /// Display the modifier as a human-readable string
    pub fn display(&self) -> String {
        let stat_name = self.stat.replace('_', " ");
        let values: Vec<String> = self
            .values
            .iter()
            .map(|(key, value)| match value {
                AffixValue::Effect { text } => text.clone(),
                _ if self.values.len() == 1 => value.display(),
                _ => format!("{} {}", value.display(), key.replace('_', " ")),
            })
            .collect();

        let mut line = format!("{} {} (T{})", values.join(", "), stat_name, self.tier);
        if self.legendary {
            line.push_str(" [L]");
        }
        line
    }
}

/// A resolved affix value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AffixValue {
    /// Constant from the tier table
    Fixed { value: i32 },
    /// Drawn from the tier's inclusive `[min, max]` bound
    Rolled { value: i32, min: i32, max: i32 },
    /// Descriptive effect with no numeric value
    Effect { text: String },
}

impl AffixValue {
    pub fn numeric(&self) -> Option<i32> {
        match self {
            AffixValue::Fixed { value } | AffixValue::Rolled { value, .. } => Some(*value),
            AffixValue::Effect { .. } => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            AffixValue::Fixed { value } | AffixValue::Rolled { value, .. } => format!("+{}", value),
            AffixValue::Effect { text } => text.clone(),
        }
    }
}

/// Socket layout. `links[i]` is the group ID of socket `i`, which is the
/// index of the first socket in that group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketData {
    pub count: usize,
    pub colors: Vec<SocketColor>,
    pub links: Vec<usize>,
}

impl SocketData {
    /// Sizes of each link group, keyed by group ID
    pub fn link_groups(&self) -> BTreeMap<usize, usize> {
        let mut groups = BTreeMap::new();
        for &group in &self.links {
            *groups.entry(group).or_insert(0) += 1;
        }
        groups
    }

    pub fn largest_link_group(&self) -> usize {
        self.link_groups().values().copied().max().unwrap_or(0)
    }

    /// Render like `R-G-B W`, with `-` joining linked sockets
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (i, color) in self.colors.iter().enumerate() {
            if i > 0 {
                let linked = self.links.get(i) == self.links.get(i - 1);
                out.push(if linked { '-' } else { ' ' });
            }
            out.push(match color {
                SocketColor::Red => 'R',
                SocketColor::Green => 'G',
                SocketColor::Blue => 'B',
                SocketColor::White => 'W',
            });
        }
        out
    }
}

/// Every field an item can be constructed with, and its default.
///
/// Unrecognized fields are rejected when deserializing, so a caller passing a
/// misspelled field gets an error instead of a silently ignored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemOptions {
    pub name: Option<String>,
    pub base_name: Option<String>,
    pub item_type: ItemType,
    pub sub_type: Option<String>,
    pub rarity: Rarity,
    pub corrupted: bool,
    pub width: u32,
    pub height: u32,
    pub item_level: u32,
    /// Computed from subtype and item level when absent
    pub requirements: Option<Requirements>,
    pub stackable: bool,
    pub weight: f32,
    pub affixes: AffixSet,
    pub sockets: Option<SocketData>,
    pub identified: bool,
    pub quality: u32,
    pub unique_id: Option<String>,
    pub flavor_text: Option<String>,
    pub legendary_effect: Option<String>,
    pub defenses: Defenses,
    pub damage: Option<WeaponDamage>,
}

impl Default for ItemOptions {
    fn default() -> Self {
        ItemOptions {
            name: None,
            base_name: None,
            item_type: ItemType::Misc,
            sub_type: None,
            rarity: Rarity::Normal,
            corrupted: false,
            width: 1,
            height: 1,
            item_level: 1,
            requirements: None,
            stackable: false,
            weight: 0.0,
            affixes: AffixSet::default(),
            sockets: None,
            identified: true,
            quality: 0,
            unique_id: None,
            flavor_text: None,
            legendary_effect: None,
            defenses: Defenses::default(),
            damage: None,
        }
    }
}

impl ItemOptions {
    /// Build the item. `requirements` is used only when the options carry none.
    pub fn into_item(self, id: Uuid, requirements: Requirements) -> ItemData {
        let base_name = self
            .base_name
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("{:?}", self.item_type));
        let name = self.name.unwrap_or_else(|| base_name.clone());

        ItemData {
            id,
            name,
            base_name,
            item_type: self.item_type,
            sub_type: self.sub_type,
            rarity: self.rarity,
            corrupted: self.corrupted,
            width: self.width,
            height: self.height,
            item_level: self.item_level,
            requirements: self.requirements.unwrap_or(requirements),
            stackable: self.stackable,
            weight: self.weight,
            affixes: self.affixes,
            sockets: self.sockets,
            identified: self.identified,
            quality: self.quality,
            unique_id: self.unique_id,
            flavor_text: self.flavor_text,
            legendary_effect: self.legendary_effect,
            defenses: self.defenses,
            damage: self.damage,
        }
    }
}
