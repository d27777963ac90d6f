//! Threshold-based Accept-Reject classifier.
//!
//! A room is accepted when its preference triple is close to the player's on
//! every weapon axis:
//!
//! ```text
//! accepted  ⇔  |player(w) - room(w)| ≤ threshold   for w in {fire, beam, wave}
//! ```
//!
//! With `normalize` set, both triples are first scaled so their largest
//! component is `1.0`, which compares the *shape* of the preferences rather than
//! their magnitude.

use cavern_evaluator::PreferenceTriple;
use serde::{Deserialize, Serialize};

use crate::{Classification, Classifier};

/// Classifies a room by the per-axis deviation of the two triples.
///
/// ```
/// use cavern_classifier::{Classification, accept_reject};
/// use cavern_evaluator::PreferenceTriple;
///
/// let player = PreferenceTriple::new(0.2, 0.8, 0.0);
/// let room = PreferenceTriple::new(0.25, 1.0, 0.1);
///
/// assert_eq!(accept_reject::classify(&player, &room, 0.1, false), Classification::Rejected);
/// assert_eq!(accept_reject::classify(&player, &room, 0.25, true), Classification::Accepted);
/// ```
#[must_use]
pub fn classify(
    player: &PreferenceTriple,
    room: &PreferenceTriple,
    threshold: f64,
    normalize: bool,
) -> Classification {
    let (player, room) = if normalize {
        (player.normalized(), room.normalized())
    } else {
        (*player, *room)
    };
    let accepted = player.deviation(&room).iter().all(|&d| d <= threshold);
    Classification::from_accepted(accepted)
}

/// [`classify`] with fixed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptRejectClassifier {
    pub threshold: f64,
    pub normalize: bool,
}

impl Default for AcceptRejectClassifier {
    fn default() -> Self {
        Self {
            threshold: 0.25,
            normalize: true,
        }
    }
}

impl Classifier for AcceptRejectClassifier {
    fn name(&self) -> &'static str {
        "AR"
    }

    fn classify(&self, player: &PreferenceTriple, room: &PreferenceTriple) -> Classification {
        classify(player, room, self.threshold, self.normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_triples_accepted_at_zero_threshold() {
        for p in [
            PreferenceTriple::new(0.0, 0.0, 0.0),
            PreferenceTriple::new(0.1, 0.7, 0.3),
            PreferenceTriple::new(2.0, 0.5, 0.5),
        ] {
            assert_eq!(classify(&p, &p, 0.0, false), Classification::Accepted);
            assert_eq!(classify(&p, &p, 0.0, true), Classification::Accepted);
        }
    }

    #[test]
    fn test_single_axis_over_threshold_rejected() {
        let player = PreferenceTriple::new(0.5, 0.5, 0.5);
        let room = PreferenceTriple::new(0.5, 0.5, 0.75);
        assert_eq!(classify(&player, &room, 0.25, false), Classification::Accepted);
        assert_eq!(classify(&player, &room, 0.2, false), Classification::Rejected);
    }

    #[test]
    fn test_normalize_compares_shape() {
        let player = PreferenceTriple::new(0.1, 0.2, 0.0);
        let room = PreferenceTriple::new(0.5, 1.0, 0.0);
        assert_eq!(classify(&player, &room, 0.0, false), Classification::Rejected);
        assert_eq!(classify(&player, &room, 0.0, true), Classification::Accepted);
    }

    #[test]
    fn test_trait_object() {
        let classifier: &dyn Classifier = &AcceptRejectClassifier::default();
        assert_eq!(classifier.name(), "AR");
        let p = PreferenceTriple::new(1.0, 0.0, 0.0);
        let q = PreferenceTriple::new(0.0, 1.0, 0.0);
        assert_eq!(classifier.classify(&p, &q), Classification::Rejected);
    }
}
