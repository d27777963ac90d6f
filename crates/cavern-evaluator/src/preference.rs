use cavern_engine::Weapon;
use cavern_telemetry::{PlayerStatCollection, RoomStatCollection};

use crate::similarity::{SimilarityError, cosine_similarity, normalize_maxed};

/// Hits landed per use of a weapon: `hits / max(uses, 1)`.
#[must_use]
pub fn weapon_efficiency(hits: u32, uses: u32) -> f64 {
    f64::from(hits) / f64::from(uses.max(1))
}

/// How strongly a player favors `weapon`.
///
/// The weapon's efficiency weighted by its share of all hits the player landed:
///
/// ```text
/// efficiency(w) × hits(w) / total_hits
/// ```
///
/// Returns `0.0` when no stats are available or the player never hit anything.
#[must_use]
pub fn player_weapon_preference(stats: Option<&PlayerStatCollection>, weapon: Weapon) -> f64 {
    let Some(player) = stats else {
        return 0.0;
    };
    let total_hits = player.total_hits();
    if total_hits == 0 {
        return 0.0;
    }
    let hits = player.hits(weapon);
    weapon_efficiency(hits, player.uses(weapon)) * (f64::from(hits) / as_f64(total_hits))
}

/// Share of a room's enemies and obstacles that are vulnerable to `weapon`.
///
/// Returns `0.0` when no stats are available or the room is empty.
#[must_use]
pub fn room_weapon_preference(stats: Option<&RoomStatCollection>, weapon: Weapon) -> f64 {
    let Some(room) = stats else {
        return 0.0;
    };
    let total = room.total_enemies() + room.total_obstacles();
    if total == 0 {
        return 0.0;
    }
    let count = u64::from(room.enemies(weapon)) + u64::from(room.obstacles(weapon));
    as_f64(count) / as_f64(total)
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn as_f64(value: u64) -> f64 {
    value as f64
}

/// Per-weapon affinities `(fire, beam, wave)` of a player or a room.
///
/// # Example
///
/// ```
/// use cavern_engine::{Seed, Weapon};
/// use cavern_evaluator::PreferenceTriple;
/// use cavern_telemetry::PlayerStatCollection;
///
/// let mut player = PlayerStatCollection::new(Seed::new(0));
/// for _ in 0..4 {
///     player.record_use(Weapon::Beam);
/// }
/// player.record_hit(Weapon::Beam);
/// player.record_hit(Weapon::Beam);
///
/// let triple = PreferenceTriple::player(Some(&player));
/// assert_eq!(triple.as_array(), [0.0, 0.5, 0.0]);
/// assert_eq!(triple.normalized().as_array(), [0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreferenceTriple {
    pub fire: f64,
    pub beam: f64,
    pub wave: f64,
}

impl PreferenceTriple {
    #[must_use]
    pub const fn new(fire: f64, beam: f64, wave: f64) -> Self {
        Self { fire, beam, wave }
    }

    #[must_use]
    pub const fn from_array([fire, beam, wave]: [f64; 3]) -> Self {
        Self { fire, beam, wave }
    }

    #[must_use]
    pub fn player(stats: Option<&PlayerStatCollection>) -> Self {
        Self::from_array(Weapon::ALL.map(|w| player_weapon_preference(stats, w)))
    }

    #[must_use]
    pub fn room(stats: Option<&RoomStatCollection>) -> Self {
        Self::from_array(Weapon::ALL.map(|w| room_weapon_preference(stats, w)))
    }

    #[must_use]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.fire, self.beam, self.wave]
    }

    #[must_use]
    pub const fn get(&self, weapon: Weapon) -> f64 {
        match weapon {
            Weapon::Fire => self.fire,
            Weapon::Beam => self.beam,
            Weapon::Wave => self.wave,
        }
    }

    /// Scales the triple so its largest component is `1.0`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::from_array(normalize_maxed(self.fire, self.beam, self.wave))
    }

    /// Absolute difference per weapon.
    #[must_use]
    pub fn deviation(&self, other: &Self) -> [f64; 3] {
        [
            (self.fire - other.fire).abs(),
            (self.beam - other.beam).abs(),
            (self.wave - other.wave).abs(),
        ]
    }

    /// Largest absolute difference over the three weapons.
    #[must_use]
    pub fn max_deviation(&self, other: &Self) -> f64 {
        self.deviation(other).into_iter().fold(0.0, f64::max)
    }

    /// Cosine similarity between two triples.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::ZeroMagnitude`] when either triple is all zeros.
    pub fn cosine_similarity(&self, other: &Self) -> Result<f64, SimilarityError> {
        cosine_similarity(&self.as_array(), &other.as_array())
    }
}

#[cfg(test)]
mod tests {
    use cavern_engine::{
        Seed,
        generation::{FeatureParameters, WeaponCounts},
    };
    use cavern_telemetry::PlayerStat;

    use super::*;

    fn player(uses: [u32; 3], hits: [u32; 3]) -> PlayerStatCollection {
        let mut player = PlayerStatCollection::new(Seed::new(0));
        for (i, weapon) in Weapon::ALL.into_iter().enumerate() {
            for _ in 0..uses[i] {
                player.record_use(weapon);
            }
            for _ in 0..hits[i] {
                player.record_hit(weapon);
            }
        }
        player
    }

    #[test]
    fn test_weapon_efficiency() {
        assert_eq!(weapon_efficiency(3, 4), 0.75);
        assert_eq!(weapon_efficiency(2, 0), 2.0);
        assert_eq!(weapon_efficiency(0, 0), 0.0);
    }

    #[test]
    fn test_player_weapon_preference() {
        let player = player([4, 2, 0], [2, 2, 0]);
        // fire: 2/4 efficiency, half of all hits
        assert_eq!(player_weapon_preference(Some(&player), Weapon::Fire), 0.25);
        assert_eq!(player_weapon_preference(Some(&player), Weapon::Beam), 0.5);
        assert_eq!(player_weapon_preference(Some(&player), Weapon::Wave), 0.0);
    }

    #[test]
    fn test_player_weapon_preference_without_hits() {
        let player = player([5, 5, 5], [0, 0, 0]);
        assert_eq!(player_weapon_preference(Some(&player), Weapon::Fire), 0.0);
        assert_eq!(player_weapon_preference(None, Weapon::Fire), 0.0);
    }

    #[test]
    fn test_room_weapon_preference() {
        let features = FeatureParameters {
            enemies: WeaponCounts::from_array([2, 1, 0]),
            obstacles: WeaponCounts::from_array([0, 1, 0]),
        };
        let room = RoomStatCollection::from_features(Seed::new(0), &features);
        assert_eq!(room_weapon_preference(Some(&room), Weapon::Fire), 0.5);
        assert_eq!(room_weapon_preference(Some(&room), Weapon::Beam), 0.5);
        assert_eq!(room_weapon_preference(Some(&room), Weapon::Wave), 0.0);

        let empty = RoomStatCollection::new(Seed::new(0));
        assert_eq!(room_weapon_preference(Some(&empty), Weapon::Fire), 0.0);
        assert_eq!(room_weapon_preference(None, Weapon::Fire), 0.0);
    }

    #[test]
    fn test_saturated_counters() {
        let mut player = PlayerStatCollection::new(Seed::new(0));
        player.set(PlayerStat::FireUses, u32::MAX);
        player.set(PlayerStat::FireHits, u32::MAX);
        player.set(PlayerStat::BeamUses, 2);
        player.set(PlayerStat::BeamHits, 2);
        let total = f64::from(u32::MAX) + 2.0;
        let fire = player_weapon_preference(Some(&player), Weapon::Fire);
        assert!((fire - f64::from(u32::MAX) / total).abs() < 1e-12);
        assert!(player_weapon_preference(Some(&player), Weapon::Beam) > 0.0);

        let features = FeatureParameters {
            enemies: WeaponCounts::from_array([u32::MAX, 0, 0]),
            obstacles: WeaponCounts::from_array([1, 0, 0]),
        };
        let room = RoomStatCollection::from_features(Seed::new(0), &features);
        assert_eq!(room_weapon_preference(Some(&room), Weapon::Fire), 1.0);
        assert_eq!(room_weapon_preference(Some(&room), Weapon::Beam), 0.0);
    }

    #[test]
    fn test_room_triple_sums_to_one() {
        let seed = Seed::new(77);
        let room = RoomStatCollection::from_features(seed, &FeatureParameters::partition(seed, 7, 4));
        let sum: f64 = PreferenceTriple::room(Some(&room)).as_array().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deviation() {
        let a = PreferenceTriple::new(0.2, 0.5, 1.0);
        let b = PreferenceTriple::new(0.5, 0.5, 0.25);
        let deviation = a.deviation(&b);
        assert!((deviation[0] - 0.3).abs() < 1e-12);
        assert_eq!(deviation[1], 0.0);
        assert_eq!(deviation[2], 0.75);
        assert_eq!(a.max_deviation(&b), 0.75);
        assert_eq!(a.max_deviation(&a), 0.0);
    }

    #[test]
    fn test_triple_similarity() {
        let a = PreferenceTriple::new(1.0, 0.0, 0.0);
        let b = PreferenceTriple::new(0.0, 0.0, 1.0);
        assert_eq!(a.cosine_similarity(&b), Ok(0.0));
        assert_eq!(
            a.cosine_similarity(&PreferenceTriple::default()),
            Err(SimilarityError::ZeroMagnitude)
        );
    }
}
