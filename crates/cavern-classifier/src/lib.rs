//! Room acceptance classifiers.
//!
//! Both classifiers answer the same question: does a candidate room match the
//! weapon preferences of a player? They compare the player's and the room's
//! [`PreferenceTriple`](cavern_evaluator::PreferenceTriple)s and label the room
//! [`Classification::Accepted`] or [`Classification::Rejected`].
//!
//! # Classifiers
//!
//! - [`accept_reject`] - stateless threshold on the per-weapon deviation
//! - [`gaussian_nb`] - two-class Gaussian Naive Bayes over the cosine similarity
//!   of the two triples, trained from labeled examples
//!
//! # Architecture
//!
//! ```text
//! player triple ─┐
//!                ├─► Classifier ─► Classification
//! room triple   ─┘       ▲
//!                        │ (GNB only)
//!           LabeledSample ─► GnbModel::fit
//! ```
//!
//! Both implement [`Classifier`], so bulk classification can use either one
//! through a trait object. A [`GnbModel`](gaussian_nb::GnbModel) only exists once
//! it has been trained, so an untrained classifier cannot be used.

use std::fmt;

use cavern_evaluator::PreferenceTriple;

pub use self::classification::*;

pub mod accept_reject;
mod classification;
pub mod gaussian_nb;

/// Labels a room given the player's and the room's preference triples.
pub trait Classifier: fmt::Debug + Send + Sync {
    /// Short algorithm name stored alongside classification results.
    fn name(&self) -> &'static str;

    /// Classifies one (player, room) pair.
    fn classify(&self, player: &PreferenceTriple, room: &PreferenceTriple) -> Classification;
}
