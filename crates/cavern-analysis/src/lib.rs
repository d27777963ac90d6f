//! Offline dataset generation and classifier evaluation.
//!
//! # Workflow
//!
//! ```text
//! DatasetConfig ─► DatasetGenerator ─► dataset CSV
//!                                          │
//!                         ┌────────────────┴───────────────┐
//!                         ▼                                ▼
//!                 GnbModel::fit (training)      BulkClassification (AR or GNB)
//!                                                          │
//!                                                          ▼
//!                                                   ResultsFile JSON
//!                                                          │
//!                                                          ▼
//!                                                  EvaluationSummary
//! ```
//!
//! # Modules
//!
//! - [`config`] - [`DatasetConfig`](config::DatasetConfig), parameters of generation
//! - [`dataset`] - [`DatasetEntry`](dataset::DatasetEntry) and the CSV file format
//! - [`generator`] - rejection-sampling [`DatasetGenerator`](generator::DatasetGenerator)
//! - [`results`] - classification sessions and bulk classification
//! - [`evaluation`] - confusion-matrix metrics accumulated across sessions

pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod generator;
pub mod results;
