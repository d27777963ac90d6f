use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Confusion-matrix counts of a binary classifier.
///
/// "Positive" means the room was liked (ground truth) or accepted (prediction).
///
/// # Example
///
/// ```
/// use cavern_stats::confusion::ConfusionMatrix;
///
/// let mut matrix = ConfusionMatrix::default();
/// matrix.record(true, true); // liked, accepted
/// matrix.record(true, false); // liked, rejected
/// matrix.record(false, false); // not liked, rejected
///
/// assert_eq!(matrix.true_positive, 1);
/// assert_eq!(matrix.false_negative, 1);
/// assert_eq!(matrix.true_negative, 1);
/// assert_eq!(matrix.precision(), 1.0);
/// assert_eq!(matrix.recall(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub true_negative: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    /// Buckets one (ground truth, prediction) pair.
    pub fn record(&mut self, liked: bool, accepted: bool) {
        match (liked, accepted) {
            (true, true) => self.true_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_negative += 1,
            (false, true) => self.false_positive += 1,
        }
    }

    /// Builds a matrix from `(ground truth, prediction)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut matrix = Self::default();
        for (liked, accepted) in pairs {
            matrix.record(liked, accepted);
        }
        matrix
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// `TP / (TP + FP)`, or `0.0` when nothing was accepted.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`, or `0.0` when nothing was liked.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// Harmonic mean of precision and recall, or `0.0` when both are zero.
    #[must_use]
    pub fn f_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }

    /// `(TP + TN) / total`, or `0.0` for an empty matrix.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    #[must_use]
    pub fn metrics(&self) -> ClassificationMetrics {
        ClassificationMetrics {
            precision: self.precision(),
            recall: self.recall(),
            f_score: self.f_score(),
        }
    }
}

impl Add for ConfusionMatrix {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for ConfusionMatrix {
    fn add_assign(&mut self, rhs: Self) {
        self.true_positive += rhs.true_positive;
        self.true_negative += rhs.true_negative;
        self.false_positive += rhs.false_positive;
        self.false_negative += rhs.false_negative;
    }
}

/// Precision, recall and F-score derived from a [`ConfusionMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

#[expect(clippy::cast_precision_loss)]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
