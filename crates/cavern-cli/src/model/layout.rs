use std::collections::BTreeMap;

use cavern_engine::{
    Direction, Grid, Position, Seed,
    generation::{BuildOutcome, Dungeon, FeatureParameters, RoomNode},
};
use serde::{Deserialize, Serialize};

/// JSON form of a generated dungeon level.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutFile {
    pub seed: Seed,
    pub level: usize,
    pub width: usize,
    pub height: usize,
    pub outcome: LayoutOutcome,
    pub grid: Grid,
    /// Grid after every smoothing pass, noise first. Empty unless requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Grid>,
    pub rooms: Vec<LayoutRoom>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayoutOutcome {
    Complete,
    Exhausted { placed: usize, requested: usize },
    EndUnplaced,
    Cancelled { placed: usize, requested: usize },
}

impl From<BuildOutcome> for LayoutOutcome {
    fn from(outcome: BuildOutcome) -> Self {
        match outcome {
            BuildOutcome::Complete => Self::Complete,
            BuildOutcome::Exhausted { placed, requested } => Self::Exhausted { placed, requested },
            BuildOutcome::EndUnplaced => Self::EndUnplaced,
            BuildOutcome::Cancelled { placed, requested } => Self::Cancelled { placed, requested },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutRoom {
    pub id: usize,
    /// `Start`, `Interior` or `End`.
    pub kind: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    pub features: FeatureParameters,
    pub doors: BTreeMap<Direction, LayoutDoor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LayoutDoor {
    pub room: usize,
    pub open: bool,
}

impl LayoutRoom {
    fn new(node: &RoomNode) -> Self {
        let doors = Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                let neighbor = node.neighbor(dir)?;
                Some((
                    dir,
                    LayoutDoor {
                        room: neighbor.index(),
                        open: node.is_door_open(dir),
                    },
                ))
            })
            .collect();
        Self {
            id: node.id().index(),
            kind: node.kind().to_string(),
            position: node.position(),
            seed: node.seed(),
            features: *node.features(),
            doors,
        }
    }
}

impl LayoutFile {
    pub(crate) fn new(dungeon: &Dungeon, include_history: bool) -> Self {
        let grid = &dungeon.layout.grid;
        Self {
            seed: dungeon.seed,
            level: dungeon.level,
            width: grid.width(),
            height: grid.height(),
            outcome: dungeon.layout.outcome.into(),
            grid: grid.clone(),
            history: if include_history {
                dungeon.history.snapshots().to_vec()
            } else {
                vec![]
            },
            rooms: dungeon.layout.graph.rooms().iter().map(LayoutRoom::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use cavern_engine::generation::DungeonConfig;

    use super::*;

    fn dungeon() -> Dungeon {
        Dungeon::generate(&DungeonConfig::default(), 1, Seed::new(42)).unwrap()
    }

    #[test]
    fn test_rooms_match_graph() {
        let dungeon = dungeon();
        let file = LayoutFile::new(&dungeon, false);
        assert_eq!(file.rooms.len(), dungeon.layout.graph.len());
        assert!(file.history.is_empty());
        assert_eq!(file.rooms[0].kind, "Start");
        for room in &file.rooms {
            for (dir, door) in &room.doors {
                let other = &file.rooms[door.room];
                let back = other.doors[&dir.opposite()];
                assert_eq!(back.room, room.id);
                assert_eq!(back.open, door.open);
            }
        }
    }

    #[test]
    fn test_history_is_optional() {
        let dungeon = dungeon();
        let file = LayoutFile::new(&dungeon, true);
        assert_eq!(file.history.len(), dungeon.history.len());
        let json = serde_json::to_value(&file).unwrap();
        assert!(json["history"].is_array());
        assert!(json["outcome"]["status"].is_string());
    }
}
