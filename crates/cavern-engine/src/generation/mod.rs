//! Dungeon generation pipeline.
//!
//! - [`shape`](create_noise_grid) - random noise and cellular-automata smoothing
//! - [`GridHistory`] - smoothing snapshots with a movable cursor
//! - [`partition_total`] / [`FeatureParameters`] - per-room enemy and obstacle counts
//! - [`RoomGraphBuilder`] - backtracking placement of a connected room tree
//! - [`Dungeon`] - the pipeline end to end, driven by a [`DungeonConfig`]
//!
//! ```text
//! create_noise_grid ──► GridHistory (smooth × N) ──► RoomGraphBuilder ──► RoomLayout
//!                                                      │
//!                                     partition_total ─┘ (interior rooms)
//! ```

pub use self::{config::*, dungeon::*, history::*, partition::*, room_graph::*, shape::*};

mod config;
mod dungeon;
mod history;
mod partition;
mod room_graph;
mod shape;
