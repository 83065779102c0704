use crate::affix;
use crate::config::{BaseItemConfig, Config};
use crate::events::{ItemEventSink, NullSink};
use crate::item::{Affix, Defenses, ItemData, ItemOptions, WeaponDamage};
use crate::legendary;
use crate::rarity::{roll_item_rarity, LEGENDARY_MIN_LEVEL};
use crate::requirements::generate_requirements;
use crate::sockets::{generate_sockets, SocketOptions};
use crate::types::*;
use crate::unique;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    #[error("Unique item not found: {0}")]
    UniqueNotFound(String),
    #[error("Base item not found: {0}")]
    BaseItemNotFound(String),
    #[error("No base items configured for {0:?}")]
    NoBaseItems(ItemType),
}

/// Item generator over a shared, read-only config.
///
/// All randomness comes from the caller's RNG, so one `Generator` can serve
/// many threads as long as each brings its own stream.
pub struct Generator {
    config: Arc<Config>,
    sink: Arc<dyn ItemEventSink>,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<Config>) -> Self {
        Generator {
            config,
            sink: Arc::new(NullSink),
        }
    }

    /// Replace the notification sink
    pub fn with_sink(mut self, sink: Arc<dyn ItemEventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a seeded RNG from a u64 seed
    pub fn make_rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Build an item from explicit options and announce it
    pub fn create_item(&self, options: ItemOptions, rng: &mut impl Rng) -> ItemData {
        let item = self.assemble(options, rng);
        self.publish(&item);
        item
    }

    /// Build an item without announcing it. Requirements are computed from
    /// subtype and item level unless the options carry their own.
    pub(crate) fn assemble(&self, options: ItemOptions, rng: &mut impl Rng) -> ItemData {
        let id = item_id(rng);
        let requirements = match options.requirements {
            Some(reqs) => reqs,
            None => generate_requirements(
                &self.config.requirements,
                options.sub_type.as_deref(),
                options.item_level,
            ),
        };
        options.into_item(id, requirements)
    }

    pub(crate) fn publish(&self, item: &ItemData) {
        log::debug!(
            "Created {:?} {:?} '{}' (ilvl {}, {} affixes)",
            item.rarity,
            item.item_type,
            item.name,
            item.item_level,
            item.affix_count()
        );
        self.sink.item_created(item);
    }

    /// Options for an item built on a base template, with base stats scaled
    /// by `1 + item_level / 100`
    pub fn options_from_base(base: &BaseItemConfig, item_level: u32) -> ItemOptions {
        let scale = 1.0 + item_level as f64 / 100.0;
        let scaled = |v: i32| (v as f64 * scale).floor() as i32;

        ItemOptions {
            name: Some(base.name.clone()),
            base_name: Some(base.name.clone()),
            item_type: base.item_type,
            sub_type: base.sub_type.clone(),
            width: base.width,
            height: base.height,
            item_level,
            stackable: base.stackable,
            weight: base.weight,
            defenses: Defenses {
                armor: base.armor.map(scaled),
                evasion: base.evasion.map(scaled),
                energy_shield: base.energy_shield.map(scaled),
            },
            damage: base.damage.map(|[min, max]| WeaponDamage {
                min: scaled(min),
                max: scaled(max),
                attack_speed: base.attack_speed,
                critical_chance: base.critical_chance,
            }),
            ..ItemOptions::default()
        }
    }

    /// Pick a base template whose level window contains `item_level`. With no
    /// match, the first template of the type is used.
    pub fn select_base(
        &self,
        item_type: ItemType,
        item_level: u32,
        rng: &mut impl Rng,
    ) -> Result<&BaseItemConfig, ForgeError> {
        let bases = self.config.base_items.get(item_type);
        let matching: Vec<&BaseItemConfig> =
            bases.iter().filter(|b| b.contains_level(item_level)).collect();

        if let Some(base) = matching.choose(rng).copied() {
            return Ok(base);
        }

        let fallback = bases.first().ok_or(ForgeError::NoBaseItems(item_type))?;
        log::warn!(
            "No {:?} base covers item level {}, falling back to '{}'",
            item_type,
            item_level,
            fallback.id
        );
        Ok(fallback)
    }

    pub fn generate_random_weapon(
        &self,
        item_level: u32,
        rarity: Rarity,
        rng: &mut impl Rng,
    ) -> Result<ItemData, ForgeError> {
        self.generate_random_item(ItemType::Weapon, item_level, rarity, rng)
    }

    pub fn generate_random_armor(
        &self,
        item_level: u32,
        rarity: Rarity,
        rng: &mut impl Rng,
    ) -> Result<ItemData, ForgeError> {
        self.generate_random_item(ItemType::Armor, item_level, rarity, rng)
    }

    /// Generate an item of the given type and rarity on a level-appropriate base.
    ///
    /// Legendary requests go through the legendary path. Unique requests pick
    /// a unique of the same type, or become Rare if none exist.
    pub fn generate_random_item(
        &self,
        item_type: ItemType,
        item_level: u32,
        rarity: Rarity,
        rng: &mut impl Rng,
    ) -> Result<ItemData, ForgeError> {
        match rarity {
            Rarity::Legendary => {
                let base_level = item_level.max(LEGENDARY_MIN_LEVEL);
                let base = self.select_base(item_type, base_level, rng)?;
                return Ok(self.create_legendary_item(item_level, base, rng));
            }
            Rarity::Unique => {
                let keys = self.config.uniques.keys_of_type(item_type);
                if let Some(key) = keys.choose(rng) {
                    return self.create_unique_item(key, rng);
                }
                log::warn!("No {:?} uniques configured, rolling a rare instead", item_type);
                return self.generate_random_item(item_type, item_level, Rarity::Rare, rng);
            }
            Rarity::Normal | Rarity::Magic | Rarity::Rare => {}
        }

        let base = self.select_base(item_type, item_level, rng)?;
        let mut item = self.assemble(Self::options_from_base(base, item_level), rng);

        affix::apply_affixes(&self.config.affixes, &mut item, rarity, item_level, rng);
        item.requirements =
            generate_requirements(&self.config.requirements, item.sub_type.as_deref(), item_level);

        if rarity == Rarity::Rare {
            item.name = self.generate_rare_name(rng);
        }

        if item_type.is_socketable() {
            item.sockets = Some(generate_sockets(&item, &SocketOptions::default(), rng));
        }

        self.publish(&item);
        Ok(item)
    }

    /// Roll a rarity from `rarity_bonus` and generate an item of that rarity
    pub fn generate_item(
        &self,
        item_type: ItemType,
        item_level: u32,
        rarity_bonus: f64,
        rng: &mut impl Rng,
    ) -> Result<ItemData, ForgeError> {
        let rarity = roll_item_rarity(item_level, rarity_bonus, rng);
        self.generate_random_item(item_type, item_level, rarity, rng)
    }

    /// Add an affix to an item if its rarity has room. A Normal item is
    /// promoted to Magic by its first affix.
    ///
    /// Returns false, leaving the item untouched, when the slot is full.
    pub fn add_affix(&self, item: &mut ItemData, affix: Affix) -> bool {
        let effective = match item.rarity {
            Rarity::Normal => Rarity::Magic,
            other => other,
        };

        let (used, cap) = match affix.affix_type {
            AffixType::Prefix => (item.affixes.prefixes.len(), effective.max_prefixes()),
            AffixType::Suffix => (item.affixes.suffixes.len(), effective.max_suffixes()),
        };

        if used >= cap {
            log::debug!(
                "Rejected {:?} '{}' on {:?} item '{}': {}/{} used",
                affix.affix_type,
                affix.stat,
                item.rarity,
                item.name,
                used,
                cap
            );
            return false;
        }

        item.affixes.push(affix);
        item.rarity = effective;
        true
    }

    /// Draw fresh values for every affix, keeping each affix's stat and tier.
    /// Legendary affixes redraw within their already enhanced bounds.
    ///
    /// Returns a new item. The original item is not modified.
    pub fn reroll_values(&self, item: &ItemData, rng: &mut impl Rng) -> ItemData {
        let mut new_item = item.clone();
        for affix in new_item.affixes.iter_mut() {
            affix::reroll_affix_values(affix, rng);
        }
        new_item
    }

    /// Look up a unique by name (case-insensitive) and build it
    pub fn create_unique_item(&self, name: &str, rng: &mut impl Rng) -> Result<ItemData, ForgeError> {
        let item = unique::create_unique_item(self, name, rng)?;
        self.publish(&item);
        Ok(item)
    }

    pub fn create_legendary_item(
        &self,
        item_level: u32,
        base: &BaseItemConfig,
        rng: &mut impl Rng,
    ) -> ItemData {
        let item = legendary::create_legendary_item(self, item_level, base, rng);
        self.publish(&item);
        item
    }

    pub fn create_legendary_item_by_id(
        &self,
        item_level: u32,
        base_id: &str,
        rng: &mut impl Rng,
    ) -> Result<ItemData, ForgeError> {
        let base = self
            .config
            .base_items
            .find(base_id)
            .ok_or_else(|| ForgeError::BaseItemNotFound(base_id.to_string()))?;
        Ok(self.create_legendary_item(item_level, base, rng))
    }

    /// Generate a random two-word name for rare and legendary items
    pub fn generate_rare_name(&self, rng: &mut impl Rng) -> String {
        const FIRST: &[&str] = &[
            "Ash", "Bitter", "Carrion", "Dusk", "Ember", "Gloom", "Hollow", "Iron", "Mourn",
            "Night", "Oath", "Pyre", "Raven", "Rot", "Sorrow", "Storm", "Thorn", "Vile", "Woe",
            "Wyrm",
        ];

        const SECOND: &[&str] = &[
            "Bane", "Brand", "Coil", "Crest", "Fang", "Grip", "Heart", "Hew", "Knell", "Lash",
            "Mantle", "Needle", "Pelt", "Reaver", "Shell", "Spur", "Thirst", "Veil", "Ward",
            "Whorl",
        ];

        let first = FIRST.choose(rng).copied().unwrap_or("Nameless");
        let second = SECOND.choose(rng).copied().unwrap_or("Relic");

        format!("{} {}", first, second)
    }
}

/// Mint a reproducible identity from the caller's RNG
fn item_id(rng: &mut impl Rng) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
