use std::path::PathBuf;

use anyhow::Context as _;
use cavern_analysis::results::{BulkClassification, ResultsFile};
use cavern_classifier::{Classifier, accept_reject::AcceptRejectClassifier};
use chrono::Utc;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Algorithm {
    /// Accept-Reject threshold on the preference deviation
    #[default]
    Ar,
    /// Gaussian Naive Bayes over the cosine similarity
    Gnb,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    /// Dataset CSV file to classify
    #[arg(long)]
    dataset: PathBuf,
    /// Classifier to use: `ar` or `gnb`
    #[arg(long, default_value = "ar")]
    algorithm: Algorithm,
    /// GNB model file, required with `--algorithm gnb`
    #[arg(long)]
    model: Option<PathBuf>,
    /// Accept-Reject threshold
    #[arg(long)]
    threshold: Option<f64>,
    /// Compare raw preferences instead of max-normalized ones
    #[arg(long)]
    no_normalize: bool,
    /// 1-based dungeon level recorded in every entry
    #[arg(long, default_value_t = 1)]
    level: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ClassifyArg) -> anyhow::Result<()> {
    let ClassifyArg {
        dataset,
        algorithm,
        model,
        threshold,
        no_normalize,
        level,
        output,
    } = arg;

    let entries = util::read_dataset_file(dataset)?;
    let classifier: Box<dyn Classifier> = match algorithm {
        Algorithm::Ar => {
            let default = AcceptRejectClassifier::default();
            Box::new(AcceptRejectClassifier {
                threshold: threshold.unwrap_or(default.threshold),
                normalize: !no_normalize,
            })
        }
        Algorithm::Gnb => {
            let path = model
                .as_ref()
                .context("Missing --model for the GNB classifier")?;
            let file = util::read_gnb_model_file(path)?;
            tracing::info!(name = %file.name, trained_at = %file.trained_at, "loaded GNB model");
            Box::new(file.to_model())
        }
    };

    let mut bulk = BulkClassification::new(classifier.as_ref(), &entries, *level);
    let results = ResultsFile::from_classified(classifier.name(), bulk.by_ref(), Utc::now());
    if bulk.undecided() > 0 {
        tracing::warn!(
            undecided = bulk.undecided(),
            "some entries could not be classified and count as rejected"
        );
    }
    Output::save_json(&results, output.clone())?;

    let matrix = results.confusion_matrix();
    let metrics = matrix.metrics();
    eprintln!("{} classification completed", results.algorithm);
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Entries: {}", bulk.classified());
    eprintln!("  Undecided: {}", bulk.undecided());
    eprintln!("  Precision: {:.3}", metrics.precision);
    eprintln!("  Recall:    {:.3}", metrics.recall);
    eprintln!("  F-score:   {:.3}", metrics.f_score);

    Ok(())
}
