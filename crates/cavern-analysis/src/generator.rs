//! Synthetic dataset generation by rejection sampling.
//!
//! # How It Works
//!
//! 1. **Draw a player profile** - split the use budget across weapons with the
//!    partitioner, then draw the hits of each weapon uniformly from `0..=uses`.
//!    Profiles that never hit anything are redrawn.
//! 2. **Sample rooms** - for every accepted and rejected example the profile
//!    needs, draw rooms from random seeds and label them with the Accept-Reject
//!    classifier until a room with the wanted label comes up.
//! 3. **Give up gracefully** - after `max_attempts` candidates the last one is
//!    emitted anyway, still labeled with the wanted label, and counted in
//!    [`GenerationProgress::exhausted`].
//!
//! The generator is an [`Iterator`] of [`DatasetEntry`]s, so callers decide how
//! fast to drive it. It stops early once its [`CancelFlag`] is set.

use std::iter::FusedIterator;

use cavern_classifier::accept_reject;
use cavern_engine::{
    CancelFlag, Seed, Weapon,
    generation::{FeatureParameters, partition_total},
};
use cavern_evaluator::PreferenceTriple;
use cavern_telemetry::{PlayerStat, PlayerStatCollection, RoomStatCollection};
use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{config::DatasetConfig, dataset::DatasetEntry};

/// Counters describing how far generation has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationProgress {
    /// Player profiles drawn so far.
    pub profiles: usize,
    /// Entries emitted so far.
    pub entries: usize,
    /// Entries whose label was forced after `max_attempts` candidates.
    pub exhausted: usize,
    /// Candidate rooms drawn so far.
    pub candidates: usize,
}

/// Iterator producing labeled dataset entries.
///
/// # Example
///
/// ```
/// use cavern_analysis::{config::DatasetConfig, generator::DatasetGenerator};
/// use cavern_engine::Seed;
///
/// let config = DatasetConfig {
///     profiles: 2,
///     accepted_per_profile: 3,
///     rejected_per_profile: 3,
///     ..DatasetConfig::default()
/// };
/// let entries: Vec<_> = DatasetGenerator::new(config, Seed::new(1)).collect();
/// assert_eq!(entries.len(), 12);
/// assert_eq!(entries.iter().filter(|e| e.ground_truth).count(), 6);
/// ```
#[derive(Debug)]
pub struct DatasetGenerator {
    config: DatasetConfig,
    rng: Pcg32,
    cancel: Option<CancelFlag>,
    player: Option<PlayerStatCollection>,
    accepted_left: usize,
    rejected_left: usize,
    progress: GenerationProgress,
    done: bool,
}

impl DatasetGenerator {
    #[must_use]
    pub fn new(config: DatasetConfig, seed: Seed) -> Self {
        Self {
            config,
            rng: seed.rng(),
            cancel: None,
            player: None,
            accepted_left: 0,
            rejected_left: 0,
            progress: GenerationProgress::default(),
            done: false,
        }
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[must_use]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    #[must_use]
    pub fn progress(&self) -> GenerationProgress {
        self.progress
    }

    fn draw_player(&mut self) -> PlayerStatCollection {
        let mut player = self.draw_player_once();
        let mut attempts = 1;
        while player.total_hits() == 0 && attempts < self.config.max_attempts {
            player = self.draw_player_once();
            attempts += 1;
        }
        if player.total_hits() == 0 {
            tracing::warn!(seed = %player.seed(), "player profile without hits after {attempts} draws");
        }
        player
    }

    fn draw_player_once(&mut self) -> PlayerStatCollection {
        let seed: Seed = self.rng.random();
        let mut player = PlayerStatCollection::new(seed);
        let uses = partition_total(self.config.player_use_budget, seed);
        for (weapon, uses) in Weapon::ALL.into_iter().zip(uses) {
            player.set(PlayerStat::uses(weapon), uses);
            player.set(PlayerStat::hits(weapon), self.rng.random_range(0..=uses));
        }
        let enemy_attacks = self.rng.random_range(0..=self.config.player_use_budget);
        player.set(PlayerStat::EnemyAttacks, enemy_attacks);
        player.set(PlayerStat::HitsTaken, self.rng.random_range(0..=enemy_attacks));
        player
    }

    fn draw_room(&mut self) -> RoomStatCollection {
        let seed: Seed = self.rng.random();
        let limits = self.config.room_limits;
        let features = FeatureParameters::partition(seed, limits.max_enemies, limits.max_obstacles);
        self.progress.candidates += 1;
        RoomStatCollection::from_features(seed, &features)
    }

    fn sample_room(&mut self, player_triple: &PreferenceTriple, accepted: bool) -> RoomStatCollection {
        let DatasetConfig {
            acceptance_threshold: threshold,
            normalize,
            max_attempts,
            ..
        } = self.config;
        let mut room = self.draw_room();
        for _ in 1..max_attempts {
            let room_triple = PreferenceTriple::room(Some(&room));
            let label = accept_reject::classify(player_triple, &room_triple, threshold, normalize);
            if label.is_accepted() == accepted {
                return room;
            }
            room = self.draw_room();
        }
        let room_triple = PreferenceTriple::room(Some(&room));
        let label = accept_reject::classify(player_triple, &room_triple, threshold, normalize);
        if label.is_accepted() != accepted {
            self.progress.exhausted += 1;
            tracing::debug!(
                player = %self.player.as_ref().map_or(Seed::new(0), PlayerStatCollection::seed),
                accepted,
                "rejection sampling exhausted"
            );
        }
        room
    }
}

impl Iterator for DatasetGenerator {
    type Item = DatasetEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            tracing::info!(progress = ?self.progress, "dataset generation cancelled");
            self.done = true;
            return None;
        }

        while self.accepted_left == 0 && self.rejected_left == 0 {
            if self.progress.profiles >= self.config.profiles {
                tracing::info!(progress = ?self.progress, "dataset generation finished");
                self.done = true;
                return None;
            }
            self.player = Some(self.draw_player());
            self.progress.profiles += 1;
            self.accepted_left = self.config.accepted_per_profile;
            self.rejected_left = self.config.rejected_per_profile;
        }
        let player = self.player.clone()?;

        let accepted = if self.accepted_left > 0 {
            self.accepted_left -= 1;
            true
        } else {
            self.rejected_left -= 1;
            false
        };
        let room = self.sample_room(&PreferenceTriple::player(Some(&player)), accepted);
        self.progress.entries += 1;
        Some(DatasetEntry {
            player,
            room,
            ground_truth: accepted,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.config.total_entries().saturating_sub(self.progress.entries);
        (0, Some(remaining))
    }
}

impl FusedIterator for DatasetGenerator {}

#[cfg(test)]
mod tests {
    use cavern_classifier::Classification;

    use super::*;

    fn small_config() -> DatasetConfig {
        DatasetConfig {
            profiles: 3,
            accepted_per_profile: 4,
            rejected_per_profile: 2,
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn test_counts_per_profile() {
        let mut generator = DatasetGenerator::new(small_config(), Seed::new(8));
        let entries: Vec<_> = generator.by_ref().collect();
        assert_eq!(entries.len(), 18);
        assert_eq!(entries.iter().filter(|e| e.ground_truth).count(), 12);
        let progress = generator.progress();
        assert_eq!(progress.profiles, 3);
        assert_eq!(progress.entries, 18);
        assert!(progress.candidates >= 18);
        assert!(generator.next().is_none());
    }

    #[test]
    fn test_profiles_hit_something() {
        for entry in DatasetGenerator::new(small_config(), Seed::new(3)) {
            assert!(entry.player.total_hits() > 0);
            assert_eq!(entry.player.total_uses(), u64::from(small_config().player_use_budget));
            for weapon in Weapon::ALL {
                assert!(entry.player.hits(weapon) <= entry.player.uses(weapon));
            }
            assert!(entry.player.hits_taken() <= entry.player.enemy_attacks());
        }
    }

    #[test]
    fn test_rooms_meet_budgets() {
        let config = small_config();
        for entry in DatasetGenerator::new(config.clone(), Seed::new(21)) {
            assert_eq!(entry.room.total_enemies(), u64::from(config.room_limits.max_enemies));
            assert_eq!(entry.room.total_obstacles(), u64::from(config.room_limits.max_obstacles));
        }
    }

    #[test]
    fn test_labels_match_classifier_unless_exhausted() {
        let config = small_config();
        let mut generator = DatasetGenerator::new(config.clone(), Seed::new(5));
        let mismatched = generator
            .by_ref()
            .filter(|entry| {
                let label = accept_reject::classify(
                    &entry.player_triple(),
                    &entry.room_triple(),
                    config.acceptance_threshold,
                    config.normalize,
                );
                label != Classification::from_accepted(entry.ground_truth)
            })
            .count();
        assert_eq!(mismatched, generator.progress().exhausted);
    }

    #[test]
    fn test_single_attempt_forces_labels() {
        let config = DatasetConfig {
            max_attempts: 1,
            acceptance_threshold: 0.0,
            ..small_config()
        };
        let mut generator = DatasetGenerator::new(config, Seed::new(2));
        let entries: Vec<_> = generator.by_ref().collect();
        assert_eq!(entries.len(), 18);
        assert_eq!(generator.progress().candidates, 18);
        assert!(generator.progress().exhausted > 0);
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a: Vec<_> = DatasetGenerator::new(small_config(), Seed::new(9)).collect();
        let b: Vec<_> = DatasetGenerator::new(small_config(), Seed::new(9)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cancel_stops_generation() {
        let cancel = CancelFlag::new();
        let mut generator =
            DatasetGenerator::new(small_config(), Seed::new(1)).with_cancel_flag(cancel.clone());
        assert!(generator.next().is_some());
        cancel.cancel();
        assert!(generator.next().is_none());
        assert_eq!(generator.progress().entries, 1);
    }
}
