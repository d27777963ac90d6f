use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::core::{Seed, Weapon};

/// Splits `total` into three non-negative parts that sum to `total`.
///
/// The random stream is reseeded from `seed` on every call: two cut points are
/// drawn uniformly from `0..=total`, sorted, and the three segment lengths are
/// returned. Calling this twice with the same seed yields correlated (identical
/// cut-point) draws, which is relied upon for reproducing rooms from their seed.
///
/// ```
/// use cavern_engine::{Seed, generation::partition_total};
///
/// let parts = partition_total(10, Seed::new(5));
/// assert_eq!(parts.iter().sum::<u32>(), 10);
/// assert_eq!(parts, partition_total(10, Seed::new(5)));
/// ```
#[must_use]
pub fn partition_total(total: u32, seed: Seed) -> [u32; 3] {
    let mut rng = seed.rng();
    let mut cuts = [rng.random_range(0..=total), rng.random_range(0..=total)];
    cuts.sort_unstable();
    let [low, high] = cuts;
    [low, high - low, total - high]
}

/// Count of features per weapon category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WeaponCounts {
    pub fire: u32,
    pub beam: u32,
    pub wave: u32,
}

impl WeaponCounts {
    pub const ZERO: Self = Self {
        fire: 0,
        beam: 0,
        wave: 0,
    };

    #[must_use]
    pub const fn from_array([fire, beam, wave]: [u32; 3]) -> Self {
        Self { fire, beam, wave }
    }

    #[must_use]
    pub const fn as_array(&self) -> [u32; 3] {
        [self.fire, self.beam, self.wave]
    }

    #[must_use]
    pub const fn get(&self, weapon: Weapon) -> u32 {
        match weapon {
            Weapon::Fire => self.fire,
            Weapon::Beam => self.beam,
            Weapon::Wave => self.wave,
        }
    }

    /// Sum of the three counts, widened so that it cannot overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.as_array().into_iter().map(u64::from).sum()
    }
}

/// Enemy and obstacle counts of a single room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FeatureParameters {
    pub enemies: WeaponCounts,
    pub obstacles: WeaponCounts,
}

impl FeatureParameters {
    /// Features of start and end rooms.
    pub const EMPTY: Self = Self {
        enemies: WeaponCounts::ZERO,
        obstacles: WeaponCounts::ZERO,
    };

    /// Partitions the enemy and obstacle budgets across weapon categories.
    ///
    /// Both partitions reseed from the same `seed`.
    #[must_use]
    pub fn partition(seed: Seed, enemy_budget: u32, obstacle_budget: u32) -> Self {
        Self {
            enemies: WeaponCounts::from_array(partition_total(enemy_budget, seed)),
            obstacles: WeaponCounts::from_array(partition_total(obstacle_budget, seed)),
        }
    }

    #[must_use]
    pub fn total_enemies(&self) -> u64 {
        self.enemies.total()
    }

    #[must_use]
    pub fn total_obstacles(&self) -> u64 {
        self.obstacles.total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_enemies() == 0 && self.total_obstacles() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_total() {
        assert_eq!(partition_total(0, Seed::new(17)), [0, 0, 0]);
    }

    #[test]
    fn test_same_seed_reproduces_partition() {
        for seed in 0..32 {
            let seed = Seed::new(seed);
            assert_eq!(partition_total(25, seed), partition_total(25, seed));
        }
    }

    #[test]
    fn test_feature_parameters_meet_budgets() {
        let features = FeatureParameters::partition(Seed::new(11), 8, 5);
        assert_eq!(features.total_enemies(), 8);
        assert_eq!(features.total_obstacles(), 5);
        assert!(!features.is_empty());
        assert!(FeatureParameters::EMPTY.is_empty());
    }

    #[test]
    fn test_weapon_counts_accessors() {
        let counts = WeaponCounts::from_array([1, 2, 3]);
        assert_eq!(counts.get(Weapon::Fire), 1);
        assert_eq!(counts.get(Weapon::Beam), 2);
        assert_eq!(counts.get(Weapon::Wave), 3);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.as_array(), [1, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_partition_sums_to_total(total in 0u32..100_000, seed in any::<u64>()) {
            let parts = partition_total(total, Seed::new(seed));
            prop_assert_eq!(parts.iter().map(|&p| u64::from(p)).sum::<u64>(), u64::from(total));
        }
    }
}
