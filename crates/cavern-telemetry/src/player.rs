use std::sync::mpsc;

use cavern_engine::{Seed, Weapon};

use crate::{StatChange, StatCollection};

/// Stats recorded about a player.
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
pub enum PlayerStat {
    FireUses,
    FireHits,
    BeamUses,
    BeamHits,
    WaveUses,
    WaveHits,
    HitsTaken,
    EnemyAttacks,
}

impl PlayerStat {
    pub const LEN: usize = 8;
    pub const ALL: [Self; Self::LEN] = [
        Self::FireUses,
        Self::FireHits,
        Self::BeamUses,
        Self::BeamHits,
        Self::WaveUses,
        Self::WaveHits,
        Self::HitsTaken,
        Self::EnemyAttacks,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FireUses => "FireUses",
            Self::FireHits => "FireHits",
            Self::BeamUses => "BeamUses",
            Self::BeamHits => "BeamHits",
            Self::WaveUses => "WaveUses",
            Self::WaveHits => "WaveHits",
            Self::HitsTaken => "HitsTaken",
            Self::EnemyAttacks => "EnemyAttacks",
        }
    }

    #[must_use]
    pub const fn uses(weapon: Weapon) -> Self {
        match weapon {
            Weapon::Fire => Self::FireUses,
            Weapon::Beam => Self::BeamUses,
            Weapon::Wave => Self::WaveUses,
        }
    }

    #[must_use]
    pub const fn hits(weapon: Weapon) -> Self {
        match weapon {
            Weapon::Fire => Self::FireHits,
            Weapon::Beam => Self::BeamHits,
            Weapon::Wave => Self::WaveHits,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Combat telemetry of one player profile.
///
/// Gameplay code records weapon uses, hits landed, hits taken and enemy attacks
/// through the `record_*` methods; the evaluator reads them back through the
/// typed accessors.
///
/// ```
/// use cavern_engine::{Seed, Weapon};
/// use cavern_telemetry::PlayerStatCollection;
///
/// let mut player = PlayerStatCollection::new(Seed::new(1));
/// player.record_use(Weapon::Fire);
/// player.record_use(Weapon::Fire);
/// player.record_hit(Weapon::Fire);
///
/// assert_eq!(player.uses(Weapon::Fire), 2);
/// assert_eq!(player.total_hits(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatCollection {
    seed: Seed,
    stats: StatCollection,
}

impl PlayerStatCollection {
    #[must_use]
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            stats: StatCollection::new(PlayerStat::ALL.map(PlayerStat::name)),
        }
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
    pub fn get(&self, stat: PlayerStat) -> u32 {
        self.stats.value_at(stat.index())
    }

    pub fn set(&mut self, stat: PlayerStat, value: u32) -> StatChange {
        self.stats.set_at(stat.index(), value)
    }

    #[must_use]
    pub fn uses(&self, weapon: Weapon) -> u32 {
        self.get(PlayerStat::uses(weapon))
    }

    #[must_use]
    pub fn hits(&self, weapon: Weapon) -> u32 {
        self.get(PlayerStat::hits(weapon))
    }

    #[must_use]
    pub fn hits_taken(&self) -> u32 {
        self.get(PlayerStat::HitsTaken)
    }

    #[must_use]
    pub fn enemy_attacks(&self) -> u32 {
        self.get(PlayerStat::EnemyAttacks)
    }

    pub fn record_use(&mut self, weapon: Weapon) -> StatChange {
        self.stats.increment_at(PlayerStat::uses(weapon).index())
    }

    pub fn record_hit(&mut self, weapon: Weapon) -> StatChange {
        self.stats.increment_at(PlayerStat::hits(weapon).index())
    }

    pub fn record_hit_taken(&mut self) -> StatChange {
        self.stats.increment_at(PlayerStat::HitsTaken.index())
    }

    pub fn record_enemy_attack(&mut self) -> StatChange {
        self.stats.increment_at(PlayerStat::EnemyAttacks.index())
    }

    #[must_use]
    pub fn total_hits(&self) -> u64 {
        Weapon::ALL.into_iter().map(|w| u64::from(self.hits(w))).sum()
    }

    #[must_use]
    pub fn total_uses(&self) -> u64 {
        Weapon::ALL.into_iter().map(|w| u64::from(self.uses(w))).sum()
    }

    pub fn reset(&mut self) -> Vec<StatChange> {
        self.stats.reset()
    }

    pub fn subscribe(&mut self) -> mpsc::Receiver<StatChange> {
        self.stats.subscribe()
    }
}
