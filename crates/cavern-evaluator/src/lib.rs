//! Preference evaluation of players and rooms.
//!
//! The evaluator turns raw telemetry counters into the numbers the classifiers
//! compare:
//!
//! ```text
//! PlayerStatCollection ──► player preference ─┐
//!                                              ├─► PreferenceTriple ──► classifier
//! RoomStatCollection   ──► room preference   ─┘      (fire, beam, wave)
//! ```
//!
//! - [`preference`] - per-weapon preferences of a player and of a room
//! - [`similarity`] - max-normalization and cosine similarity of triples
//! - [`rating`] - difficulty and dodge ratings
//!
//! Every function is total: a missing collection or a zero denominator yields
//! `0.0`. The only fallible operation is [`similarity::cosine_similarity`], which
//! is undefined for empty, mismatched or zero-magnitude vectors.

pub use self::{preference::*, rating::*, similarity::*};

pub mod preference;
pub mod rating;
pub mod similarity;
