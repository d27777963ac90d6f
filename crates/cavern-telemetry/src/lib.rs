//! Combat telemetry counters.
//!
//! Gameplay collaborators record what the player does and what a room contains
//! into closed vocabularies of named counters:
//!
//! - [`StatCollection`] - generic named counters with change notification
//! - [`PlayerStatCollection`] - weapon uses and hits, hits taken, enemy attacks
//! - [`RoomStatCollection`] - enemies and obstacles per weapon category
//!
//! Every mutation returns a [`StatChange`] describing the old and new value, and
//! the same change is published to every channel opened with
//! [`StatCollection::subscribe`].

pub use self::{player::*, room::*, stat::*};

mod player;
mod room;
mod stat;
