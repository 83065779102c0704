use crate::config::RequirementTable;
use crate::types::Requirements;

/// Derive equip requirements from an item's subtype and level.
///
/// The level requirement is 80% of item level. Attribute requirements come
/// from the subtype's base spread scaled by `1 + item_level / 100`; unknown or
/// missing subtypes have no attribute requirements.
pub fn generate_requirements(
    table: &RequirementTable,
    sub_type: Option<&str>,
    item_level: u32,
) -> Requirements {
    let level = (item_level as f64 * 0.8).floor() as u32;
    let Some(spread) = sub_type.and_then(|s| table.get(s)) else {
        return Requirements {
            level,
            ..Requirements::default()
        };
    };

    Requirements {
        level,
        strength: scale_attribute(spread.strength, item_level),
        dexterity: scale_attribute(spread.dexterity, item_level),
        intelligence: scale_attribute(spread.intelligence, item_level),
    }
}

fn scale_attribute(base: u32, item_level: u32) -> u32 {
    (base as f64 * (1.0 + item_level as f64 / 100.0)).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeSpread;
    use proptest::prelude::*;

    fn table() -> RequirementTable {
        RequirementTable::from_entries(vec![
            AttributeSpread {
                sub_type: "sword".to_string(),
                strength: 20,
                dexterity: 20,
                intelligence: 0,
            },
            AttributeSpread {
                sub_type: "wand".to_string(),
                strength: 0,
                dexterity: 0,
                intelligence: 30,
            },
        ])
    }

    #[test]
    fn test_sword_requirements() {
        let reqs = generate_requirements(&table(), Some("sword"), 50);
        assert_eq!(reqs.level, 40);
        assert_eq!(reqs.strength, 30);
        assert_eq!(reqs.dexterity, 30);
        assert_eq!(reqs.intelligence, 0);
    }

    #[test]
    fn test_scaling_floors() {
        // 30 * 1.33 = 39.9
        let reqs = generate_requirements(&table(), Some("Wand"), 33);
        assert_eq!(reqs.level, 26);
        assert_eq!(reqs.intelligence, 39);
    }

    #[test]
    fn test_unknown_subtype_only_sets_level() {
        let reqs = generate_requirements(&table(), Some("boomerang"), 10);
        assert_eq!(
            reqs,
            Requirements {
                level: 8,
                ..Requirements::default()
            }
        );
        assert_eq!(generate_requirements(&table(), None, 10).level, 8);
    }

    proptest! {
        #[test]
        fn test_level_is_floor_of_eighty_percent(level in 0u32..=1000) {
            let reqs = generate_requirements(&table(), Some("sword"), level);
            prop_assert_eq!(reqs.level, level * 4 / 5);
        }

        #[test]
        fn test_requirements_are_deterministic(level in 0u32..=200) {
            let a = generate_requirements(&table(), Some("sword"), level);
            let b = generate_requirements(&table(), Some("sword"), level);
            prop_assert_eq!(a, b);
        }
    }
}
