//! Rarity rolls.
//!
//! A uniform roll in `[0, 100)` is stretched by the rarity bonus and then
//! checked against fixed thresholds. With a large enough bonus the adjusted
//! roll passes 100, so the Unique threshold is reachable on ordinary rolls and
//! Legendary (gated at item level 60) needs roughly a doubled roll.

use crate::types::Rarity;
use rand::Rng;

/// Minimum item level at which a Legendary can be rolled
pub const LEGENDARY_MIN_LEVEL: u32 = 60;

const LEGENDARY_THRESHOLD: f64 = 199.8;
const UNIQUE_THRESHOLD: f64 = 99.5;
const RARE_THRESHOLD: f64 = 90.0;
const MAGIC_THRESHOLD: f64 = 60.0;

/// Roll a rarity for an item of the given level. `rarity_bonus` is a
/// percentage (50.0 means +50% increased rarity).
pub fn roll_item_rarity(item_level: u32, rarity_bonus: f64, rng: &mut impl Rng) -> Rarity {
    let roll: f64 = rng.gen_range(0.0..100.0);
    rarity_for_roll(item_level, adjusted_roll(roll, rarity_bonus))
}

pub fn adjusted_roll(roll: f64, rarity_bonus: f64) -> f64 {
    roll * (1.0 + rarity_bonus / 100.0)
}

/// Map an already adjusted roll to a rarity. Thresholds are checked from the
/// top down and the first match wins.
pub fn rarity_for_roll(item_level: u32, adjusted: f64) -> Rarity {
    if item_level >= LEGENDARY_MIN_LEVEL && adjusted > LEGENDARY_THRESHOLD {
        Rarity::Legendary
    } else if adjusted > UNIQUE_THRESHOLD {
        Rarity::Unique
    } else if adjusted > RARE_THRESHOLD {
        Rarity::Rare
    } else if adjusted > MAGIC_THRESHOLD {
        Rarity::Magic
    } else {
        Rarity::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_thresholds() {
        assert_eq!(rarity_for_roll(1, 0.0), Rarity::Normal);
        assert_eq!(rarity_for_roll(1, 60.0), Rarity::Normal);
        assert_eq!(rarity_for_roll(1, 60.1), Rarity::Magic);
        assert_eq!(rarity_for_roll(1, 90.5), Rarity::Rare);
        assert_eq!(rarity_for_roll(1, 99.6), Rarity::Unique);
        assert_eq!(rarity_for_roll(59, 250.0), Rarity::Unique);
        assert_eq!(rarity_for_roll(60, 199.8), Rarity::Unique);
        assert_eq!(rarity_for_roll(60, 199.9), Rarity::Legendary);
    }

    #[test]
    fn test_adjusted_roll_can_exceed_hundred() {
        assert_eq!(adjusted_roll(50.0, 0.0), 50.0);
        assert_eq!(adjusted_roll(80.0, 150.0), 200.0);
    }

    #[test]
    fn test_no_bonus_never_legendary() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..5000 {
            assert_ne!(roll_item_rarity(100, 0.0, &mut rng), Rarity::Legendary);
        }
    }

    #[test]
    fn test_large_bonus_reaches_legendary() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let legendaries = (0..2000)
            .filter(|_| roll_item_rarity(80, 300.0, &mut rng) == Rarity::Legendary)
            .count();
        // adjusted = roll * 4, so any roll above ~49.95 qualifies
        assert!(legendaries > 800, "got {}", legendaries);
    }

    #[test]
    fn test_distribution_without_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut normal = 0;
        let mut magic = 0;
        for _ in 0..10_000 {
            match roll_item_rarity(30, 0.0, &mut rng) {
                Rarity::Normal => normal += 1,
                Rarity::Magic => magic += 1,
                _ => {}
            }
        }
        // 60% normal, 30% magic
        assert!((5700..6300).contains(&normal), "normal {}", normal);
        assert!((2700..3300).contains(&magic), "magic {}", magic);
    }
}
