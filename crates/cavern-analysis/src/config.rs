use cavern_engine::generation::LevelLimits;
use serde::{Deserialize, Serialize};

/// Parameters of synthetic dataset generation.
///
/// Missing fields fall back to [`DatasetConfig::default`] when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of player profiles to draw.
    pub profiles: usize,
    /// Accepted examples generated per profile.
    pub accepted_per_profile: usize,
    /// Rejected examples generated per profile.
    pub rejected_per_profile: usize,
    /// Accept-Reject threshold that defines the ground truth.
    pub acceptance_threshold: f64,
    pub normalize: bool,
    /// Candidate rooms drawn per example before giving up.
    pub max_attempts: usize,
    /// Total weapon uses split across the weapons of a profile.
    pub player_use_budget: u32,
    /// Enemy and obstacle budgets of generated rooms.
    pub room_limits: LevelLimits,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            profiles: 20,
            accepted_per_profile: 10,
            rejected_per_profile: 10,
            acceptance_threshold: 0.25,
            normalize: true,
            max_attempts: 1000,
            player_use_budget: 60,
            room_limits: LevelLimits::default(),
        }
    }
}

impl DatasetConfig {
    /// Number of entries a full run emits.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.profiles * (self.accepted_per_profile + self.rejected_per_profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::default();
        assert_eq!(config.max_attempts, 1000);
        assert_eq!(config.acceptance_threshold, 0.25);
        assert!(config.normalize);
        assert_eq!(config.total_entries(), 400);
    }

    #[test]
    fn test_partial_config() {
        let config: DatasetConfig =
            serde_json::from_str(r#"{ "profiles": 2, "room_limits": { "max_enemies": 9, "max_obstacles": 1 } }"#)
                .unwrap();
        assert_eq!(config.profiles, 2);
        assert_eq!(config.room_limits.max_enemies, 9);
        assert_eq!(config.max_attempts, 1000);
    }
}
