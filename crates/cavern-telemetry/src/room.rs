use std::sync::mpsc;

use cavern_engine::{
    Seed, Weapon,
    generation::{FeatureParameters, WeaponCounts},
};

use crate::{StatChange, StatCollection};

/// Stats describing the contents of a room.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    derive_more::FromStr,
)]
pub enum RoomStat {
    FireEnemies,
    BeamEnemies,
    WaveEnemies,
    FireObstacles,
    BeamObstacles,
    WaveObstacles,
}

impl RoomStat {
    pub const LEN: usize = 6;
    pub const ALL: [Self; Self::LEN] = [
        Self::FireEnemies,
        Self::BeamEnemies,
        Self::WaveEnemies,
        Self::FireObstacles,
        Self::BeamObstacles,
        Self::WaveObstacles,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FireEnemies => "FireEnemies",
            Self::BeamEnemies => "BeamEnemies",
            Self::WaveEnemies => "WaveEnemies",
            Self::FireObstacles => "FireObstacles",
            Self::BeamObstacles => "BeamObstacles",
            Self::WaveObstacles => "WaveObstacles",
        }
    }

    #[must_use]
    pub const fn enemies(weapon: Weapon) -> Self {
        match weapon {
            Weapon::Fire => Self::FireEnemies,
            Weapon::Beam => Self::BeamEnemies,
            Weapon::Wave => Self::WaveEnemies,
        }
    }

    #[must_use]
    pub const fn obstacles(weapon: Weapon) -> Self {
        match weapon {
            Weapon::Fire => Self::FireObstacles,
            Weapon::Beam => Self::BeamObstacles,
            Weapon::Wave => Self::WaveObstacles,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Enemy and obstacle counts of one room, per weapon category.
///
/// ```
/// use cavern_engine::{Seed, Weapon, generation::FeatureParameters};
/// use cavern_telemetry::RoomStatCollection;
///
/// let seed = Seed::new(9);
/// let features = FeatureParameters::partition(seed, 6, 3);
/// let room = RoomStatCollection::from_features(seed, &features);
///
/// assert_eq!(room.total_enemies(), 6);
/// assert_eq!(room.total_obstacles(), 3);
/// assert_eq!(room.features(), features);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStatCollection {
    seed: Seed,
    stats: StatCollection,
}

impl RoomStatCollection {
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            stats: StatCollection::new(RoomStat::ALL.map(RoomStat::name)),
        }
    }

    #[must_use]
    pub fn from_features(seed: Seed, features: &FeatureParameters) -> Self {
        let mut room = Self::new(seed);
        for weapon in Weapon::ALL {
            room.set(RoomStat::enemies(weapon), features.enemies.get(weapon));
            room.set(RoomStat::obstacles(weapon), features.obstacles.get(weapon));
        }
        room
    }

    #[must_use]
    pub const fn seed(&self) -> Seed {
        self.seed
    }

    #[must_use]
    pub fn collection(&self) -> &StatCollection {
        &self.stats
    }

    #[must_use]
    pub fn get(&self, stat: RoomStat) -> u32 {
        self.stats.value_at(stat.index())
    }

    pub fn set(&mut self, stat: RoomStat, value: u32) -> StatChange {
        self.stats.set_at(stat.index(), value)
    }

    #[must_use]
    pub fn enemies(&self, weapon: Weapon) -> u32 {
        self.get(RoomStat::enemies(weapon))
    }

    #[must_use]
    pub fn obstacles(&self, weapon: Weapon) -> u32 {
        self.get(RoomStat::obstacles(weapon))
    }

    #[must_use]
    pub fn total_enemies(&self) -> u64 {
        Weapon::ALL.into_iter().map(|w| u64::from(self.enemies(w))).sum()
    }

    #[must_use]
    pub fn total_obstacles(&self) -> u64 {
        Weapon::ALL.into_iter().map(|w| u64::from(self.obstacles(w))).sum()
    }

    /// Returns the counts as feature parameters.
    #[must_use]
    pub fn features(&self) -> FeatureParameters {
        FeatureParameters {
            enemies: WeaponCounts::from_array(Weapon::ALL.map(|w| self.enemies(w))),
            obstacles: WeaponCounts::from_array(Weapon::ALL.map(|w| self.obstacles(w))),
        }
    }

    pub fn reset(&mut self) -> Vec<StatChange> {
        self.stats.reset()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<StatChange> {
        self.stats.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        let room = RoomStatCollection::new(Seed::new(0));
        let names: Vec<_> = room.collection().names().collect();
        assert_eq!(
            names,
            [
                "FireEnemies",
                "BeamEnemies",
                "WaveEnemies",
                "FireObstacles",
                "BeamObstacles",
                "WaveObstacles"
            ]
        );
        assert!(room.collection().iter().all(|s| s.value() == 0));
    }

    #[test]
    fn test_from_features() {
        let features = FeatureParameters {
            enemies: WeaponCounts::from_array([1, 0, 4]),
            obstacles: WeaponCounts::from_array([0, 2, 0]),
        };
        let room = RoomStatCollection::from_features(Seed::new(5), &features);
        assert_eq!(room.enemies(Weapon::Fire), 1);
        assert_eq!(room.enemies(Weapon::Wave), 4);
        assert_eq!(room.obstacles(Weapon::Beam), 2);
        assert_eq!(room.total_enemies(), 5);
        assert_eq!(room.total_obstacles(), 2);
        assert_eq!(room.features(), features);
        assert_eq!(room.collection().value("WaveEnemies").unwrap(), 4);
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let features = FeatureParameters {
            enemies: WeaponCounts::from_array([u32::MAX, u32::MAX, 1]),
            obstacles: WeaponCounts::from_array([u32::MAX; 3]),
        };
        let room = RoomStatCollection::from_features(Seed::new(0), &features);
        assert_eq!(room.total_enemies(), 2 * u64::from(u32::MAX) + 1);
        assert_eq!(room.total_obstacles(), 3 * u64::from(u32::MAX));
        assert!(!room.features().is_empty());
    }

    #[test]
    fn test_reset_clears_features() {
        let seed = Seed::new(1);
        let features = FeatureParameters::partition(seed, 5, 5);
        let mut room = RoomStatCollection::from_features(seed, &features);
        room.reset();
        assert!(room.features().is_empty());
    }
}
