//! Socket generation: how many sockets an item gets, their colours, and how
//! they are linked.

use crate::item::{ItemData, SocketData};
use crate::types::{Requirements, SocketColor};
use rand::Rng;

/// Each socket past the first is this much harder to roll
const SOCKET_STEP_PENALTY: f64 = 15.0;
const MAX_SOCKET_CHANCE: f64 = 90.0;
const MAX_LINK_CHANCE: f64 = 50.0;

/// Forced socket layout, used by the legendary path
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketOptions {
    pub guaranteed_sockets: Option<usize>,
    pub guaranteed_links: Option<usize>,
}

impl SocketOptions {
    fn is_guaranteed(&self) -> bool {
        self.guaranteed_sockets.is_some() || self.guaranteed_links.is_some()
    }
}

/// Maximum sockets for an inventory footprint (width * height)
pub fn calculate_max_sockets(footprint: u32) -> usize {
    match footprint {
        8.. => 6,
        6..=7 => 4,
        4..=5 => 3,
        2..=3 => 2,
        _ => 1,
    }
}

/// Roll a socket count in `[1, max_sockets]`. Sockets are added one at a time
/// and the first failed roll stops the ladder.
pub fn roll_socket_count(max_sockets: usize, item_level: u32, rng: &mut impl Rng) -> usize {
    let chance = (item_level as f64).min(MAX_SOCKET_CHANCE);
    let mut count = 1;

    for i in 2..=max_sockets {
        let threshold = chance - (i - 1) as f64 * SOCKET_STEP_PENALTY;
        if rng.gen_range(0.0..100.0) < threshold {
            count = i;
        } else {
            break;
        }
    }

    count
}

/// Roll a socket colour weighted by the item's attribute requirements.
/// Items without attribute requirements only get white sockets.
pub fn roll_socket_color(requirements: &Requirements, rng: &mut impl Rng) -> SocketColor {
    let weights = [
        (SocketColor::Red, requirements.strength),
        (SocketColor::Green, requirements.dexterity),
        (SocketColor::Blue, requirements.intelligence),
    ];

    let total = weights.iter().fold(0u32, |acc, (_, w)| acc.saturating_add(*w));
    if total == 0 {
        return SocketColor::White;
    }

    let mut roll = rng.gen_range(0..total);
    for (color, weight) in weights {
        if roll < weight {
            return color;
        }
        roll -= weight;
    }

    SocketColor::White
}

/// Chain sockets together: each socket joins the previous socket's group with
/// probability `min(50, item_level / 2)` percent, otherwise it starts a new group.
pub fn roll_socket_links(count: usize, item_level: u32, rng: &mut impl Rng) -> Vec<usize> {
    let chance = (item_level as f64 / 2.0).min(MAX_LINK_CHANCE);
    let mut links = Vec::with_capacity(count);

    for i in 0..count {
        let group = match links.last() {
            Some(&previous) if rng.gen_range(0.0..100.0) < chance => previous,
            _ => i,
        };
        links.push(group);
    }

    links
}

/// A single group with every socket linked to socket 0
pub fn create_linked_sockets(count: usize) -> Vec<usize> {
    vec![0; count]
}

/// Build the socket layout for an item
pub fn generate_sockets(item: &ItemData, options: &SocketOptions, rng: &mut impl Rng) -> SocketData {
    let max_sockets = calculate_max_sockets(item.footprint());

    let (count, links) = if options.is_guaranteed() {
        let count = options
            .guaranteed_sockets
            .unwrap_or(max_sockets)
            .clamp(1, max_sockets);
        if let Some(wanted) = options.guaranteed_links {
            if wanted > count {
                log::debug!(
                    "{} ({}x{}) fits {} linked sockets, {} requested",
                    item.name,
                    item.width,
                    item.height,
                    count,
                    wanted
                );
            }
        }
        (count, create_linked_sockets(count))
    } else {
        let count = roll_socket_count(max_sockets, item.item_level, rng);
        (count, roll_socket_links(count, item.item_level, rng))
    };

    let colors = (0..count)
        .map(|_| roll_socket_color(&item.requirements, rng))
        .collect();

    SocketData {
        count,
        colors,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::blank_item;
    use crate::types::ItemType;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_max_socket_bands() {
        assert_eq!(calculate_max_sockets(1), 1);
        assert_eq!(calculate_max_sockets(2), 2);
        assert_eq!(calculate_max_sockets(3), 2);
        assert_eq!(calculate_max_sockets(4), 3);
        assert_eq!(calculate_max_sockets(5), 3);
        assert_eq!(calculate_max_sockets(6), 4);
        assert_eq!(calculate_max_sockets(7), 4);
        assert_eq!(calculate_max_sockets(8), 6);
        assert_eq!(calculate_max_sockets(12), 6);
        assert_eq!(calculate_max_sockets(0), 1);
    }

    #[test]
    fn test_low_level_items_get_one_socket() {
        // chance 15 - 15 = 0 for the second socket
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..500 {
            assert_eq!(roll_socket_count(6, 15, &mut rng), 1);
        }
    }

    #[test]
    fn test_high_level_socket_counts_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let counts: Vec<usize> = (0..2000).map(|_| roll_socket_count(6, 100, &mut rng)).collect();
        assert!(counts.contains(&1));
        assert!(counts.contains(&3));
        assert!(counts.iter().all(|&c| (1..=6).contains(&c)));
    }

    #[test]
    fn test_color_follows_requirements() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let strength_only = Requirements {
            level: 10,
            strength: 40,
            ..Requirements::default()
        };
        for _ in 0..200 {
            assert_eq!(roll_socket_color(&strength_only, &mut rng), SocketColor::Red);
        }
        let none = Requirements::default();
        assert_eq!(roll_socket_color(&none, &mut rng), SocketColor::White);
    }

    #[test]
    fn test_mixed_requirements_roll_both_colors() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let reqs = Requirements {
            level: 1,
            strength: 20,
            dexterity: 20,
            intelligence: 0,
        };
        let colors: Vec<SocketColor> = (0..500).map(|_| roll_socket_color(&reqs, &mut rng)).collect();
        assert!(colors.contains(&SocketColor::Red));
        assert!(colors.contains(&SocketColor::Green));
        assert!(!colors.contains(&SocketColor::Blue));
    }

    #[test]
    fn test_links_are_chained() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let links = roll_socket_links(6, 100, &mut rng);
            assert_eq!(links[0], 0);
            for i in 1..links.len() {
                assert!(links[i] == links[i - 1] || links[i] == i);
            }
        }
        // item level 0 never links
        assert_eq!(roll_socket_links(4, 0, &mut rng), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_guaranteed_sockets_fully_linked() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut item = blank_item(ItemType::Weapon, 2, 4);
        item.item_level = 70;
        let options = SocketOptions {
            guaranteed_sockets: Some(6),
            guaranteed_links: Some(5),
        };
        let sockets = generate_sockets(&item, &options, &mut rng);
        assert_eq!(sockets.count, 6);
        assert_eq!(sockets.links, vec![0; 6]);
        assert_eq!(sockets.colors.len(), 6);
        assert_eq!(sockets.largest_link_group(), 6);
    }

    #[test]
    fn test_guaranteed_sockets_clamped_to_footprint() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let item = blank_item(ItemType::Armor, 2, 2);
        let options = SocketOptions {
            guaranteed_sockets: Some(6),
            guaranteed_links: Some(5),
        };
        let sockets = generate_sockets(&item, &options, &mut rng);
        assert_eq!(sockets.count, 3);
        assert_eq!(sockets.links, vec![0, 0, 0]);
    }

    #[test]
    fn test_extreme_host_values_do_not_overflow() {
        let mut item = blank_item(ItemType::Armor, u32::MAX, u32::MAX);
        item.item_level = 100;
        item.requirements = Requirements {
            level: 80,
            strength: u32::MAX,
            dexterity: u32::MAX,
            intelligence: 7,
        };
        assert_eq!(item.footprint(), u32::MAX);

        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..200 {
            let sockets = generate_sockets(&item, &SocketOptions::default(), &mut rng);
            assert!((1..=6).contains(&sockets.count));
            assert!(sockets.colors.iter().all(|c| *c != SocketColor::White));
        }
    }

    proptest! {
        #[test]
        fn test_socket_count_in_bounds(max in 1usize..=6, level in 0u32..=120, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let count = roll_socket_count(max, level, &mut rng);
            prop_assert!(count >= 1 && count <= max);
        }

        #[test]
        fn test_generated_layout_is_consistent(w in 1u32..=3, h in 1u32..=4, level in 1u32..=100, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut item = blank_item(ItemType::Weapon, w, h);
            item.item_level = level;
            let sockets = generate_sockets(&item, &SocketOptions::default(), &mut rng);
            prop_assert!(sockets.count <= calculate_max_sockets(w * h));
            prop_assert_eq!(sockets.colors.len(), sockets.count);
            prop_assert_eq!(sockets.links.len(), sockets.count);
            prop_assert!(sockets.links.iter().all(|&g| g < sockets.count));
        }
    }
}
