use rand::Rng as _;
use tracing::info;

use crate::core::{Cell, Seed};

use super::{
    config::DungeonConfig,
    history::GridHistory,
    room_graph::{PlacementError, RoomGraphBuilder, RoomGraphParams, RoomLayout},
    shape,
};

/// A fully generated dungeon level.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: Seed,
    pub level: usize,
    /// Noise grid followed by every smoothing snapshot.
    pub history: GridHistory,
    pub layout: RoomLayout,
}

impl Dungeon {
    /// Runs the whole pipeline: noise, smoothing, then room graph construction.
    ///
    /// All randomness derives from `seed`, so the same config, level and seed
    /// always produce the same dungeon.
    pub fn generate(config: &DungeonConfig, level: usize, seed: Seed) -> Result<Self, PlacementError> {
        let mut rng = seed.rng();
        let noise = shape::create_noise_grid(
            config.width,
            config.height,
            config.wall_density_percent,
            &mut rng,
        );
        let mut history = GridHistory::new(noise);
        let smoothed = history
            .advance_to(config.smoothing_iterations, config.neighbor_wall_threshold)
            .clone();
        info!(
            %seed,
            level,
            floor = smoothed.count(Cell::Floor),
            wall = smoothed.count(Cell::Wall),
            "smoothed grid"
        );

        let params = RoomGraphParams {
            room_count: config.room_count,
            start: config.start,
            end_room: config.end_room,
            limits: config.level_limits(level),
        };
        let layout = RoomGraphBuilder::new(smoothed, params, rng.random())?.finish();
        info!(
            rooms = layout.graph.len(),
            outcome = ?layout.outcome,
            "built room graph"
        );

        Ok(Self {
            seed,
            level,
            history,
            layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, generation::BuildOutcome};

    #[test]
    fn test_generate_is_reproducible() {
        let config = DungeonConfig::default();
        let a = Dungeon::generate(&config, 1, Seed::new(77)).unwrap();
        let b = Dungeon::generate(&config, 1, Seed::new(77)).unwrap();
        assert_eq!(a.layout.grid, b.layout.grid);
        assert_eq!(a.history.len(), config.smoothing_iterations + 1);
    }

    #[test]
    fn test_open_grid_generates_complete_level() {
        let config = DungeonConfig {
            width: 6,
            height: 6,
            wall_density_percent: 0,
            // edges see at most 5 out-of-bounds walls
            neighbor_wall_threshold: 6,
            room_count: 10,
            ..DungeonConfig::default()
        };
        let dungeon = Dungeon::generate(&config, 2, Seed::new(3)).unwrap();
        assert_eq!(dungeon.history.current(), &Grid::filled(6, 6, Cell::Floor));
        assert_eq!(dungeon.layout.outcome, BuildOutcome::Complete);
        assert_eq!(dungeon.layout.graph.interior_count(), 10);
        let limits = config.level_limits(2);
        for room in dungeon.layout.graph.rooms().iter().filter(|r| !r.is_special()) {
            assert_eq!(room.features().total_enemies(), u64::from(limits.max_enemies));
        }
    }

    #[test]
    fn test_solid_grid_cannot_place_start() {
        let config = DungeonConfig {
            wall_density_percent: 100,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            Dungeon::generate(&config, 1, Seed::new(0)),
            Err(PlacementError::NoFloor)
        ));
    }
}
