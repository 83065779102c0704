use crate::config::{AffixDatabase, AffixTierConfig, AffixTemplate, ValueSpec};
use crate::item::{Affix, AffixValue, ItemData};
use crate::types::*;
use rand::prelude::*;
use std::collections::BTreeMap;

/// Stat rolled when no template is eligible for a slot
pub const GENERIC_BONUS_STAT: &str = "generic_bonus";
const GENERIC_BONUS_RANGE: [i32; 2] = [1, 10];

/// Item levels per unlocked tier
const LEVELS_PER_TIER: u32 = 20;

/// Highest tier selectable for a template at this item level (1-based)
pub fn max_tier(tier_count: usize, item_level: u32) -> usize {
    tier_count.min((item_level / LEVELS_PER_TIER) as usize + 1)
}

/// Roll a random affix of the given slot kind for an item type.
///
/// Never fails: if nothing in the table is eligible the generic bonus is
/// returned instead.
pub fn roll_affix(
    affixes: &AffixDatabase,
    affix_type: AffixType,
    item_type: ItemType,
    item_level: u32,
    rng: &mut impl Rng,
) -> Affix {
    let eligible: Vec<&AffixTemplate> = affixes
        .get(affix_type, item_type)
        .iter()
        .filter(|t| t.min_level <= item_level && !t.tiers.is_empty())
        .collect();

    let Some(template) = eligible.choose(rng).copied() else {
        log::warn!(
            "No {:?} templates for {:?} at item level {}, using generic bonus",
            affix_type,
            item_type,
            item_level
        );
        return generic_affix(affix_type, rng);
    };

    let tier = rng.gen_range(1..=max_tier(template.tiers.len(), item_level));
    let values = roll_affix_values(&template.tiers[tier - 1], rng);

    Affix {
        affix_type,
        name: template.name.clone(),
        stat: template.stat.clone(),
        tier: tier as u32,
        values,
        legendary: false,
    }
}

fn generic_affix(affix_type: AffixType, rng: &mut impl Rng) -> Affix {
    let mut spec = BTreeMap::new();
    spec.insert("value".to_string(), ValueSpec::Range(GENERIC_BONUS_RANGE));

    Affix {
        affix_type,
        name: "Generic Bonus".to_string(),
        stat: GENERIC_BONUS_STAT.to_string(),
        tier: 1,
        values: resolve_values(&spec, rng),
        legendary: false,
    }
}

/// Resolve a tier's value spec into concrete values
pub fn roll_affix_values(tier: &AffixTierConfig, rng: &mut impl Rng) -> BTreeMap<String, AffixValue> {
    resolve_values(&tier.values, rng)
}

pub(crate) fn resolve_values(
    spec: &BTreeMap<String, ValueSpec>,
    rng: &mut impl Rng,
) -> BTreeMap<String, AffixValue> {
    spec.iter()
        .map(|(key, value)| (key.clone(), resolve_value(value, rng)))
        .collect()
}

fn resolve_value(spec: &ValueSpec, rng: &mut impl Rng) -> AffixValue {
    match spec {
        ValueSpec::Constant(value) => AffixValue::Fixed { value: *value },
        ValueSpec::Range([a, b]) => {
            let (min, max) = (*a.min(b), *a.max(b));
            AffixValue::Rolled {
                value: rng.gen_range(min..=max),
                min,
                max,
            }
        }
        ValueSpec::Effect(text) => AffixValue::Effect { text: text.clone() },
    }
}

/// Recover the spec an affix's values were resolved from
fn value_specs(affix: &Affix) -> BTreeMap<String, ValueSpec> {
    affix
        .values
        .iter()
        .map(|(key, value)| {
            let spec = match value {
                AffixValue::Fixed { value } => ValueSpec::Constant(*value),
                AffixValue::Rolled { min, max, .. } => ValueSpec::Range([*min, *max]),
                AffixValue::Effect { text } => ValueSpec::Effect(text.clone()),
            };
            (key.clone(), spec)
        })
        .collect()
}

/// Draw fresh values for an affix within its tier bounds, keeping stat and tier
pub fn reroll_affix_values(affix: &mut Affix, rng: &mut impl Rng) {
    affix.values = resolve_values(&value_specs(affix), rng);
}

/// Number of affixes an item of this rarity rolls
pub fn roll_affix_count(rarity: Rarity, rng: &mut impl Rng) -> usize {
    match rarity {
        Rarity::Normal | Rarity::Unique => 0,
        Rarity::Magic => {
            if rng.gen_bool(0.5) {
                1
            } else {
                2
            }
        }
        Rarity::Rare => rng.gen_range(4..=6),
        Rarity::Legendary => rng.gen_range(6..=8),
    }
}

/// Pick prefix or suffix for the next affix, honouring the item's caps.
/// Returns `None` when both sides are full.
pub fn choose_affix_type(item: &ItemData, rng: &mut impl Rng) -> Option<AffixType> {
    match (item.can_add_prefix(), item.can_add_suffix()) {
        (true, true) => {
            if rng.gen_bool(0.5) {
                Some(AffixType::Prefix)
            } else {
                Some(AffixType::Suffix)
            }
        }
        (true, false) => Some(AffixType::Prefix),
        (false, true) => Some(AffixType::Suffix),
        (false, false) => None,
    }
}

/// Set the item's rarity and roll its affixes. Returns the affixes added.
pub fn apply_affixes(
    affixes: &AffixDatabase,
    item: &mut ItemData,
    rarity: Rarity,
    item_level: u32,
    rng: &mut impl Rng,
) -> usize {
    item.rarity = rarity;
    let total = roll_affix_count(rarity, rng);
    let mut added = 0;

    for _ in 0..total {
        let Some(affix_type) = choose_affix_type(item, rng) else {
            break;
        };
        let affix = roll_affix(affixes, affix_type, item.item_type, item_level, rng);
        item.affixes.push(affix);
        added += 1;
    }

    added
}
