use serde::{Deserialize, Serialize};

use crate::core::Position;

/// Feature budgets of one dungeon level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLimits {
    /// Enemies placed in every interior room.
    pub max_enemies: u32,
    /// Obstacles placed in every interior room.
    pub max_obstacles: u32,
}

impl Default for LevelLimits {
    fn default() -> Self {
        Self {
            max_enemies: 4,
            max_obstacles: 2,
        }
    }
}

/// Parameters of dungeon generation.
///
/// Missing fields fall back to [`DungeonConfig::default`] when deserialized, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: usize,
    pub height: usize,
    /// Chance (0-100) of a noise cell starting as a wall.
    pub wall_density_percent: u8,
    /// A cell becomes a wall when at least this many of its 8 neighbors are walls.
    pub neighbor_wall_threshold: u8,
    pub smoothing_iterations: usize,
    /// Number of interior rooms, excluding the start and end rooms.
    pub room_count: usize,
    /// Fixed start room position. A random floor cell is used when absent.
    pub start: Option<Position>,
    pub end_room: bool,
    /// Budgets per level, indexed from level 1.
    pub levels: Vec<LevelLimits>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            wall_density_percent: 45,
            neighbor_wall_threshold: 5,
            smoothing_iterations: 4,
            room_count: 12,
            start: None,
            end_room: true,
            levels: vec![
                LevelLimits {
                    max_enemies: 3,
                    max_obstacles: 2,
                },
                LevelLimits {
                    max_enemies: 5,
                    max_obstacles: 3,
                },
                LevelLimits {
                    max_enemies: 8,
                    max_obstacles: 4,
                },
            ],
        }
    }
}

impl DungeonConfig {
    /// Returns the budgets of a 1-based `level`.
    ///
    /// Levels past the configured ones reuse the last entry; level `0` is treated as
    /// level 1.
    #[must_use]
    pub fn level_limits(&self, level: usize) -> LevelLimits {
        let index = level.saturating_sub(1).min(self.levels.len().saturating_sub(1));
        self.levels.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_limits_clamp_to_last() {
        let config = DungeonConfig::default();
        assert_eq!(config.level_limits(1).max_enemies, 3);
        assert_eq!(config.level_limits(0), config.level_limits(1));
        assert_eq!(config.level_limits(3).max_enemies, 8);
        assert_eq!(config.level_limits(99), config.level_limits(3));
    }

    #[test]
    fn test_level_limits_without_levels() {
        let config = DungeonConfig {
            levels: vec![],
            ..DungeonConfig::default()
        };
        assert_eq!(config.level_limits(2), LevelLimits::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DungeonConfig =
            serde_json::from_str(r#"{ "width": 10, "start": { "x": 1, "y": 2 } }"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, DungeonConfig::default().height);
        assert_eq!(config.start, Some(Position::new(1, 2)));
    }
}
