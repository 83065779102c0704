use serde::{Deserialize, Serialize};

/// Item rarity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Normal,
    Magic,
    Rare,
    Unique,
    Legendary,
}

impl Rarity {
    pub fn max_prefixes(&self) -> usize {
        match self {
            Rarity::Normal => 0,
            Rarity::Magic => 1,
            Rarity::Rare => 3,
            Rarity::Unique => 0, // Uniques have fixed mods
            Rarity::Legendary => 4,
        }
    }

    pub fn max_suffixes(&self) -> usize {
        match self {
            Rarity::Normal => 0,
            Rarity::Magic => 1,
            Rarity::Rare => 3,
            Rarity::Unique => 0,
            Rarity::Legendary => 4,
        }
    }

    /// Total rolled affixes this rarity may carry
    pub fn max_affixes(&self) -> usize {
        self.max_prefixes() + self.max_suffixes()
    }
}

/// Broad item category; decides which affix and base tables apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    Gem,
    Currency,
    Flask,
    Map,
    Misc,
}

impl ItemType {
    /// Weapons and armor are the only types that carry sockets
    pub fn is_socketable(&self) -> bool {
        matches!(self, ItemType::Weapon | ItemType::Armor)
    }
}

/// Socket colours, each tied to the attribute that favours it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketColor {
    /// Strength
    Red,
    /// Dexterity
    Green,
    /// Intelligence
    Blue,
    /// Accepts any gem
    White,
}

/// Affix type: prefix or suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixType {
    Prefix,
    Suffix,
}

/// Level and attribute requirements for equipping an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub dexterity: u32,
    #[serde(default)]
    pub intelligence: u32,
}

impl Requirements {
    pub fn has_any(&self) -> bool {
        self.level > 0 || self.strength > 0 || self.dexterity > 0 || self.intelligence > 0
    }
}
