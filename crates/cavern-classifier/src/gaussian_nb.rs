//! Gaussian Naive Bayes classifier over a single similarity feature.
//!
//! # Feature
//!
//! Each (player, room) pair is reduced to one scalar, the cosine similarity of
//! the two preference triples:
//!
//! ```text
//! x = cos(player triple, room triple)
//! ```
//!
//! # Training
//!
//! For each class (accepted, rejected) the model stores
//!
//! - `prior` - share of the training samples in the class
//! - `mean` - mean of `x` over the class
//! - `variance` - sample (`n - 1`) variance of `x`, floored at [`VARIANCE_FLOOR`];
//!   `0.0` for classes with fewer than two samples
//!
//! # Classification
//!
//! The posterior of a class is its Gaussian density at `x` times its prior. The
//! class with the larger posterior wins; equal posteriors give
//! [`Classification::Undecided`]. Posteriors are compared in log space so that
//! narrow classes far from `x` still order correctly after the densities
//! themselves underflow to zero.
//!
//! A [`GnbModel`] is immutable once trained. Retraining produces a new model.

use std::f64::consts::PI;

use cavern_evaluator::{PreferenceTriple, SimilarityError};
use cavern_stats::{confusion::ConfusionMatrix, descriptive::DescriptiveStats};
use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::{Classification, Classifier};

/// Smallest variance used for a class density.
pub const VARIANCE_FLOOR: f64 = 1e-8;

/// A feature value with its known label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub feature: f64,
    pub accepted: bool,
}

impl LabeledSample {
    #[must_use]
    pub const fn new(feature: f64, accepted: bool) -> Self {
        Self { feature, accepted }
    }

    /// Builds a sample from the cosine similarity of two triples.
    ///
    /// # Errors
    ///
    /// Returns an error when the similarity is undefined, such as for a player
    /// that never hit anything or an empty room.
    pub fn from_triples(
        player: &PreferenceTriple,
        room: &PreferenceTriple,
        accepted: bool,
    ) -> Result<Self, SimilarityError> {
        Ok(Self::new(player.cosine_similarity(room)?, accepted))
    }
}

/// Fitted parameters of one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassParameters {
    pub prior: f64,
    pub mean: f64,
    pub variance: f64,
}

impl ClassParameters {
    fn fit(features: &[f64], total: usize) -> Self {
        let prior = if total == 0 {
            0.0
        } else {
            as_f64(features.len()) / as_f64(total)
        };
        let Some(stats) = DescriptiveStats::new(features.iter().copied()) else {
            return Self {
                prior,
                mean: 0.0,
                variance: 0.0,
            };
        };
        let variance = if stats.count < 2 {
            0.0
        } else {
            stats.variance.max(VARIANCE_FLOOR)
        };
        Self {
            prior,
            mean: stats.mean,
            variance,
        }
    }

    /// Gaussian density of the class at `x`.
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        self.log_density(x).exp()
    }

    #[must_use]
    pub fn log_density(&self, x: f64) -> f64 {
        let variance = self.variance.max(VARIANCE_FLOOR);
        let diff = x - self.mean;
        -(diff * diff) / (2.0 * variance) - 0.5 * (2.0 * PI * variance).ln()
    }

    /// Unnormalized log posterior: `ln(prior) + ln(density(x))`.
    #[must_use]
    pub fn log_posterior(&self, x: f64) -> f64 {
        self.prior.ln() + self.log_density(x)
    }
}

/// Result of a GNB classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GnbClassification {
    pub label: Classification,
    pub posterior_accepted: f64,
    pub posterior_rejected: f64,
}

/// A trained two-class Gaussian Naive Bayes model.
///
/// # Example
///
/// ```
/// use cavern_classifier::{Classification, gaussian_nb::GnbModel};
///
/// let model = GnbModel::train(&[0.9, 0.95, 0.85], &[0.1, 0.2, 0.15]);
/// assert_eq!(model.classify_feature(0.8).label, Classification::Accepted);
/// assert_eq!(model.classify_feature(0.3).label, Classification::Rejected);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GnbModel {
    accepted: ClassParameters,
    rejected: ClassParameters,
    training: Vec<LabeledSample>,
    validation: Vec<LabeledSample>,
}

impl GnbModel {
    /// Trains on the features of disjoint accepted and rejected example sets.
    #[must_use]
    pub fn train(accepted: &[f64], rejected: &[f64]) -> Self {
        let training = accepted
            .iter()
            .map(|&x| LabeledSample::new(x, true))
            .chain(rejected.iter().map(|&x| LabeledSample::new(x, false)))
            .collect();
        Self::fit(training, vec![])
    }

    /// Trains on `training` and keeps `validation` aside for [`validate`](Self::validate).
    #[must_use]
    pub fn fit(training: Vec<LabeledSample>, validation: Vec<LabeledSample>) -> Self {
        let (accepted, rejected): (Vec<&LabeledSample>, Vec<&LabeledSample>) =
            training.iter().partition(|s| s.accepted);
        let accepted: Vec<f64> = accepted.into_iter().map(|s| s.feature).collect();
        let rejected: Vec<f64> = rejected.into_iter().map(|s| s.feature).collect();
        let total = training.len();
        let model = Self {
            accepted: ClassParameters::fit(&accepted, total),
            rejected: ClassParameters::fit(&rejected, total),
            training,
            validation,
        };
        tracing::debug!(
            accepted = ?model.accepted,
            rejected = ?model.rejected,
            training = model.training.len(),
            validation = model.validation.len(),
            "trained GNB model"
        );
        model
    }

    /// Reassembles a model from stored parameters.
    #[must_use]
    pub fn from_parts(
        accepted: ClassParameters,
        rejected: ClassParameters,
        training: Vec<LabeledSample>,
        validation: Vec<LabeledSample>,
    ) -> Self {
        Self {
            accepted,
            rejected,
            training,
            validation,
        }
    }

    #[must_use]
    pub fn accepted(&self) -> &ClassParameters {
        &self.accepted
    }

    #[must_use]
    pub fn rejected(&self) -> &ClassParameters {
        &self.rejected
    }

    #[must_use]
    pub fn training_samples(&self) -> &[LabeledSample] {
        &self.training
    }

    #[must_use]
    pub fn validation_samples(&self) -> &[LabeledSample] {
        &self.validation
    }

    /// Classifies a precomputed feature value.
    #[must_use]
    pub fn classify_feature(&self, x: f64) -> GnbClassification {
        let log_accepted = self.accepted.log_posterior(x);
        let log_rejected = self.rejected.log_posterior(x);
        let label = if log_accepted > log_rejected {
            Classification::Accepted
        } else if log_rejected > log_accepted {
            Classification::Rejected
        } else {
            Classification::Undecided
        };
        GnbClassification {
            label,
            posterior_accepted: log_accepted.exp(),
            posterior_rejected: log_rejected.exp(),
        }
    }

    /// Classifies a (player, room) pair.
    ///
    /// # Errors
    ///
    /// Returns an error when the cosine similarity of the triples is undefined.
    pub fn classify(
        &self,
        player: &PreferenceTriple,
        room: &PreferenceTriple,
    ) -> Result<GnbClassification, SimilarityError> {
        Ok(self.classify_feature(player.cosine_similarity(room)?))
    }

    /// Scores the model against its validation samples.
    #[must_use]
    pub fn validate(&self) -> ConfusionMatrix {
        self.score(&self.validation)
    }

    /// Scores the model against arbitrary labeled samples.
    #[must_use]
    pub fn score(&self, samples: &[LabeledSample]) -> ConfusionMatrix {
        ConfusionMatrix::from_pairs(samples.iter().map(|s| {
            let predicted = self.classify_feature(s.feature).label;
            (s.accepted, predicted.is_accepted())
        }))
    }
}

impl Classifier for GnbModel {
    fn name(&self) -> &'static str {
        "GNB"
    }

    fn classify(&self, player: &PreferenceTriple, room: &PreferenceTriple) -> Classification {
        GnbModel::classify(self, player, room).map_or(Classification::Undecided, |c| c.label)
    }
}

/// Shuffles `samples` and splits off `validation_ratio` of them for validation.
///
/// The ratio is clamped to `0.0..=1.0`. Returns `(training, validation)`.
pub fn split_train_validation<R>(
    mut samples: Vec<LabeledSample>,
    validation_ratio: f64,
    rng: &mut R,
) -> (Vec<LabeledSample>, Vec<LabeledSample>)
where
    R: Rng + ?Sized,
{
    samples.shuffle(rng);
    let ratio = validation_ratio.clamp(0.0, 1.0);
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let validation_len = ((as_f64(samples.len()) * ratio).round() as usize).min(samples.len());
    let validation = samples.split_off(samples.len() - validation_len);
    (samples, validation)
}

#[expect(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}
