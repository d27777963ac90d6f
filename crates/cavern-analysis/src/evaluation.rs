//! Confusion-matrix evaluation across classification sessions.
//!
//! Every [`ResultsFile`] is one session. The evaluator reports
//!
//! - the confusion matrix and metrics of each session,
//! - the matrix accumulated over all sessions and the metrics derived from it,
//! - the mean and sample standard deviation of per-session precision, recall,
//!   F-score and dodge rating.

use cavern_stats::{
    confusion::{ClassificationMetrics, ConfusionMatrix},
    descriptive::DescriptiveStats,
};
use serde::{Deserialize, Serialize};

use crate::results::ResultsFile;

/// Metrics of a single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvaluation {
    pub algorithm: String,
    pub entries: usize,
    pub matrix: ConfusionMatrix,
    pub metrics: ClassificationMetrics,
    pub mean_dodge_rating: f64,
}

impl SessionEvaluation {
    #[must_use]
    pub fn new(results: &ResultsFile) -> Self {
        let matrix = results.confusion_matrix();
        Self {
            algorithm: results.algorithm.clone(),
            entries: results.entries.len(),
            matrix,
            metrics: matrix.metrics(),
            mean_dodge_rating: results.mean_dodge_rating(),
        }
    }
}

/// Mean and sample standard deviation of a per-session metric.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std_dev: f64,
}

impl MetricSummary {
    fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        DescriptiveStats::new(values).map_or_else(Self::default, |stats| Self {
            mean: stats.mean,
            std_dev: stats.std_dev,
        })
    }
}

/// Evaluation of one or more sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub sessions: Vec<SessionEvaluation>,
    /// Matrix accumulated over every session.
    pub total: ConfusionMatrix,
    /// Metrics of the accumulated matrix.
    pub overall: ClassificationMetrics,
    pub precision: MetricSummary,
    pub recall: MetricSummary,
    pub f_score: MetricSummary,
    pub dodge_rating: MetricSummary,
}

impl EvaluationSummary {
    /// Evaluates every session in `results`.
    ///
    /// ```
    /// use cavern_analysis::{evaluation::EvaluationSummary, results::ResultsFile};
    /// use chrono::Utc;
    ///
    /// let summary = EvaluationSummary::new(&[ResultsFile::new("AR", Utc::now())]);
    /// assert_eq!(summary.sessions.len(), 1);
    /// assert_eq!(summary.overall.f_score, 0.0);
    /// ```
    #[must_use]
    pub fn new<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ResultsFile>,
    {
        let sessions: Vec<SessionEvaluation> =
            results.into_iter().map(SessionEvaluation::new).collect();
        let total = sessions
            .iter()
            .fold(ConfusionMatrix::default(), |acc, s| acc + s.matrix);
        Self {
            total,
            overall: total.metrics(),
            precision: MetricSummary::new(sessions.iter().map(|s| s.metrics.precision)),
            recall: MetricSummary::new(sessions.iter().map(|s| s.metrics.recall)),
            f_score: MetricSummary::new(sessions.iter().map(|s| s.metrics.f_score)),
            dodge_rating: MetricSummary::new(sessions.iter().map(|s| s.mean_dodge_rating)),
            sessions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::results::ResultEntry;

    fn session(pairs: &[(u8, u8)]) -> ResultsFile {
        let entries = pairs.iter().map(|&(ground_truth, classification)| ResultEntry {
            level: 1,
            classification,
            ground_truth,
            deaths: 0,
            player_stats: BTreeMap::new(),
            room_stats: BTreeMap::new(),
        });
        ResultsFile::from_classified("AR", entries, Utc::now())
    }

    #[test]
    fn test_accumulates_across_sessions() {
        let a = session(&[(1, 1), (1, 1), (0, 1)]);
        let b = session(&[(1, 0), (0, 0), (1, 1)]);
        let summary = EvaluationSummary::new([&a, &b]);

        assert_eq!(summary.sessions.len(), 2);
        assert_eq!(
            summary.total,
            ConfusionMatrix {
                true_positive: 3,
                true_negative: 1,
                false_positive: 1,
                false_negative: 1,
            }
        );
        assert_eq!(summary.overall.precision, 0.75);
        assert_eq!(summary.overall.recall, 0.75);
    }

    #[test]
    fn test_session_averages() {
        // precision 1.0 and 0.5
        let a = session(&[(1, 1), (1, 1)]);
        let b = session(&[(1, 1), (0, 1)]);
        let summary = EvaluationSummary::new([&a, &b]);
        assert!((summary.precision.mean - 0.75).abs() < 1e-12);
        let expected_std = (0.125_f64).sqrt();
        assert!((summary.precision.std_dev - expected_std).abs() < 1e-12);
        assert_eq!(summary.recall.mean, 1.0);
        assert_eq!(summary.recall.std_dev, 0.0);
    }

    #[test]
    fn test_no_sessions() {
        let summary = EvaluationSummary::new(std::iter::empty::<&ResultsFile>());
        assert!(summary.sessions.is_empty());
        assert_eq!(summary.total, ConfusionMatrix::default());
        assert_eq!(summary.precision, MetricSummary::default());
    }
}
