//! Legendary items: a Legendary-rarity roll with every affix boosted past
//! its tier, a flavour effect, and a fully linked socket group.

use crate::affix::apply_affixes;
use crate::config::{BaseItemConfig, LegendaryEffectPools};
use crate::generator::Generator;
use crate::item::{Affix, AffixValue, ItemData};
use crate::rarity::LEGENDARY_MIN_LEVEL;
use crate::sockets::{calculate_max_sockets, generate_sockets, SocketOptions};
use crate::types::*;
use rand::prelude::*;

pub const LEGENDARY_QUALITY: u32 = 20;

/// Linked sockets a legendary asks for when its footprint allows
pub const MIN_LEGENDARY_LINKS: usize = 5;

const MIN_ENHANCEMENT: f64 = 1.2;
const MAX_ENHANCEMENT: f64 = 1.5;

/// Build a legendary on the given base. Item level is raised to at least 60.
/// The item starts unidentified.
pub fn create_legendary_item(
    generator: &Generator,
    item_level: u32,
    base: &BaseItemConfig,
    rng: &mut impl Rng,
) -> ItemData {
    let config = generator.config();
    let item_level = item_level.max(LEGENDARY_MIN_LEVEL);

    let mut options = Generator::options_from_base(base, item_level);
    options.rarity = Rarity::Legendary;
    options.quality = LEGENDARY_QUALITY;
    options.identified = false;
    options.legendary_effect = roll_legendary_effect(&config.legendary_effects, base.item_type, rng);

    let mut item = generator.assemble(options, rng);
    item.name = generator.generate_rare_name(rng);

    apply_affixes(&config.affixes, &mut item, Rarity::Legendary, item_level, rng);
    for affix in item.affixes.iter_mut() {
        enhance_affix(affix, rng);
    }

    if item.item_type.is_socketable() {
        let max_sockets = calculate_max_sockets(item.footprint());
        let options = SocketOptions {
            guaranteed_sockets: Some(max_sockets),
            guaranteed_links: Some(MIN_LEGENDARY_LINKS.max(max_sockets.saturating_sub(1))),
        };
        item.sockets = Some(generate_sockets(&item, &options, rng));
    }

    item
}

pub fn roll_legendary_effect(
    pools: &LegendaryEffectPools,
    item_type: ItemType,
    rng: &mut impl Rng,
) -> Option<String> {
    pools.get(item_type).choose(rng).cloned()
}

/// Scale every numeric value of an affix by one factor drawn from
/// `[1.2, 1.5]` and mark it legendary. Rolled bounds are scaled with their
/// value, so a later reroll stays in the enhanced range.
pub fn enhance_affix(affix: &mut Affix, rng: &mut impl Rng) {
    let factor = rng.gen_range(MIN_ENHANCEMENT..=MAX_ENHANCEMENT);
    let scale = |v: i32| (v as f64 * factor).floor() as i32;
    for value in affix.values.values_mut() {
        match value {
            AffixValue::Fixed { value } => *value = scale(*value),
            AffixValue::Rolled { value, min, max } => {
                *value = scale(*value);
                *min = scale(*min);
                *max = scale(*max);
            }
            AffixValue::Effect { .. } => {}
        }
    }
    affix.legendary = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_generator;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    #[test]
    fn test_legendary_sword_at_seventy() {
        let generator = fixture_generator();
        let base = generator.config().base_items.find("corsair_sword").unwrap().clone();
        assert_eq!(calculate_max_sockets(base.footprint()), 6);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let item = generator.create_legendary_item(70, &base, &mut rng);
            assert_eq!(item.rarity, Rarity::Legendary);
            assert_eq!(item.quality, 20);
            assert_eq!(item.item_level, 70);
            assert!(!item.identified);
            assert!(item.legendary_effect.is_some());
            assert!((6..=8).contains(&item.affix_count()));
            assert!(item.affixes.prefixes.len() <= 4);
            assert!(item.affixes.suffixes.len() <= 4);
            assert!(item.affixes.iter().all(|a| a.legendary));

            let sockets = item.sockets.as_ref().unwrap();
            assert_eq!(sockets.link_groups().len(), 1);
            assert!(sockets.largest_link_group() >= 5);
        }
    }

    #[test]
    fn test_low_level_request_is_raised_to_sixty() {
        let generator = fixture_generator();
        let base = generator.config().base_items.find("rusted_sword").unwrap().clone();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let item = generator.create_legendary_item(12, &base, &mut rng);
        assert_eq!(item.item_level, 60);
        assert_eq!(item.requirements.level, 48);
    }

    #[test]
    fn test_socket_group_covers_footprint() {
        let generator = fixture_generator();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for base in generator.config().base_items.get(ItemType::Armor) {
            let item = generator.create_legendary_item(80, base, &mut rng);
            let max = calculate_max_sockets(base.footprint());
            let sockets = item.sockets.unwrap();
            assert_eq!(sockets.count, max);
            assert_eq!(sockets.largest_link_group(), max);
            if base.footprint() >= 8 {
                assert!(sockets.largest_link_group() >= MIN_LEGENDARY_LINKS);
            }
        }
    }

    #[test]
    fn test_accessories_get_no_sockets() {
        let generator = fixture_generator();
        let base = generator.config().base_items.get(ItemType::Accessory)[0].clone();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let item = generator.create_legendary_item(65, &base, &mut rng);
        assert!(item.sockets.is_none());
        assert_eq!(item.rarity, Rarity::Legendary);
    }

    #[test]
    fn test_enhancement_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1000 {
            let mut values = BTreeMap::new();
            values.insert("flat".to_string(), AffixValue::Fixed { value: 100 });
            values.insert(
                "rolled".to_string(),
                AffixValue::Rolled {
                    value: 10,
                    min: 5,
                    max: 10,
                },
            );
            values.insert("effect".to_string(), AffixValue::Effect { text: "glows".into() });
            let mut affix = Affix {
                affix_type: AffixType::Prefix,
                name: "Test".to_string(),
                stat: "added_life".to_string(),
                tier: 2,
                values,
                legendary: false,
            };
            enhance_affix(&mut affix, &mut rng);
            assert!(affix.legendary);
            let flat = affix.values["flat"].numeric().unwrap();
            assert!((119..=150).contains(&flat), "flat {}", flat);
            match &affix.values["rolled"] {
                AffixValue::Rolled { value, min, max } => {
                    assert!((11..=15).contains(value), "rolled {}", value);
                    assert!((5..=7).contains(min), "min {}", min);
                    assert!((11..=15).contains(max), "max {}", max);
                    assert!(min <= value && value <= max);
                }
                other => panic!("expected rolled value, got {:?}", other),
            }
            assert_eq!(affix.values["effect"], AffixValue::Effect { text: "glows".into() });
        }
    }
}
