//! Procedural layout of dungeon levels.
//!
//! This crate turns random noise into a connected set of rooms and decides how
//! many enemies and obstacles of each weapon category every room holds:
//!
//! - [`core`] - grid cells and positions, directions, weapon categories, seeds
//! - [`generation`] - noise, smoothing, feature partitioning and the room graph builder
//! - [`CancelFlag`] - cooperative cancellation shared by every bulk loop
//!
//! # Reproducibility
//!
//! Every random decision is drawn from a [`Pcg32`](rand_pcg::Pcg32) stream created from
//! a [`Seed`]. A level is fully determined by its config, level number and seed;
//! a room's features are fully determined by the room seed stored on the node.
//!
//! # Example
//!
//! ```
//! use cavern_engine::{Seed, generation::{Dungeon, DungeonConfig}};
//!
//! let config = DungeonConfig::default();
//! let dungeon = Dungeon::generate(&config, 1, Seed::new(42))?;
//!
//! let graph = &dungeon.layout.graph;
//! println!("{} rooms, start at {}", graph.len(), graph.start().position());
//! # Ok::<(), cavern_engine::generation::PlacementError>(())
//! ```

pub use self::{cancel::CancelFlag, core::*};

mod cancel;
pub mod core;
pub mod generation;
