use std::path::PathBuf;

use cavern_classifier::gaussian_nb::{self, GnbModel, LabeledSample};
use cavern_engine::Seed;
use chrono::Utc;

use crate::{
    model::gnb_model::GnbModelFile,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainGnbArg {
    /// Dataset CSV file to train on
    #[arg(long)]
    dataset: PathBuf,
    /// Share of the samples held out for validation
    #[arg(long, default_value_t = 0.2)]
    validation_ratio: f64,
    /// Seed of the train/validation shuffle; random when omitted
    #[arg(long)]
    seed: Option<Seed>,
    /// Name stored in the model file
    #[arg(long, default_value = "gnb")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainGnbArg) -> anyhow::Result<()> {
    let TrainGnbArg {
        dataset,
        validation_ratio,
        seed,
        name,
        output,
    } = arg;

    let entries = util::read_dataset_file(dataset)?;
    let mut samples: Vec<LabeledSample> = Vec::with_capacity(entries.len());
    for entry in &entries {
        match entry.labeled_sample() {
            Ok(sample) => samples.push(sample),
            Err(err) => tracing::warn!(
                player = %entry.player_seed(),
                room = %entry.room_seed(),
                "skipping entry without a similarity feature: {err}"
            ),
        }
    }
    if samples.is_empty() {
        anyhow::bail!("No usable samples in {}", dataset.display());
    }

    let seed = super::seed_or_random(*seed);
    let (training, validation) = split_samples(samples, *validation_ratio, seed)?;
    let model = GnbModel::fit(training, validation);
    let matrix = model.validate();
    let metrics = matrix.metrics();

    let file = GnbModelFile::from_model(name.clone(), &model, Utc::now());
    Output::save_json(&file, output.clone())?;

    eprintln!("Model saved successfully");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", file.name);
    eprintln!("  Trained at: {}", file.trained_at);
    eprintln!(
        "  Samples: {} training, {} validation",
        file.training_samples.len(),
        file.validation_samples.len()
    );
    eprintln!(
        "  Accepted: prior {:.3}, mean {:.3}, variance {:.4}",
        file.accepted.prior, file.accepted.mean, file.accepted.variance
    );
    eprintln!(
        "  Rejected: prior {:.3}, mean {:.3}, variance {:.4}",
        file.rejected.prior, file.rejected.mean, file.rejected.variance
    );
    eprintln!("  Validation:");
    eprintln!(
        "    TP {} / TN {} / FP {} / FN {}",
        matrix.true_positive, matrix.true_negative, matrix.false_positive, matrix.false_negative
    );
    eprintln!("    Precision: {:.3}", metrics.precision);
    eprintln!("    Recall:    {:.3}", metrics.recall);
    eprintln!("    F-score:   {:.3}", metrics.f_score);

    Ok(())
}

fn split_samples(
    samples: Vec<LabeledSample>,
    validation_ratio: f64,
    seed: Seed,
) -> anyhow::Result<(Vec<LabeledSample>, Vec<LabeledSample>)> {
    let total = samples.len();
    let (training, validation) =
        gaussian_nb::split_train_validation(samples, validation_ratio, &mut seed.rng());
    if training.is_empty() {
        anyhow::bail!(
            "Validation ratio {validation_ratio} leaves no training samples out of {total}"
        );
    }
    Ok((training, validation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<LabeledSample> {
        (0..10)
            .map(|i| LabeledSample::new(f64::from(i) / 10.0, i % 2 == 0))
            .collect()
    }

    #[test]
    fn test_split_keeps_training_samples() {
        let (training, validation) = split_samples(samples(), 0.2, Seed::new(4)).unwrap();
        assert_eq!((training.len(), validation.len()), (8, 2));
    }

    #[test]
    fn test_split_without_training_samples_fails() {
        let err = split_samples(samples(), 1.0, Seed::new(4)).unwrap_err();
        assert!(err.to_string().contains("no training samples"), "{err}");
        assert!(split_samples(samples(), 0.96, Seed::new(4)).is_err());
    }
}
