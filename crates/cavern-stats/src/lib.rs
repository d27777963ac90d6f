//! Statistical utilities for the Cavern project.
//!
//! This crate provides the small set of numeric tools the classifiers and the
//! evaluation pipeline share:
//!
//! - **Descriptive statistics**: count, min, max, mean and sample (`n - 1`)
//!   variance computed in a single pass
//! - **Confusion matrices**: TP/TN/FP/FN counts with precision, recall and
//!   F-score
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`confusion`]: Confusion-matrix counts of binary classifiers
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cavern_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.5);
//! ```
//!
//! ## Scoring a classifier
//!
//! ```
//! use cavern_stats::confusion::ConfusionMatrix;
//!
//! let matrix = ConfusionMatrix::from_pairs([(true, true), (false, true), (true, true)]);
//! assert!((matrix.precision() - 2.0 / 3.0).abs() < 1e-12);
//! assert_eq!(matrix.recall(), 1.0);
//! ```

pub mod confusion;
pub mod descriptive;
