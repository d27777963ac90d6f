use std::path::PathBuf;

use cavern_analysis::{config::DatasetConfig, generator::DatasetGenerator};
use cavern_engine::Seed;

use crate::util::{self, Output};

/// Entries between two progress log lines.
const PROGRESS_INTERVAL: usize = 100;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateDatasetArg {
    /// Dataset config JSON file; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed of the whole dataset; random when omitted
    #[arg(long)]
    seed: Option<Seed>,
    /// Override the number of player profiles
    #[arg(long)]
    profiles: Option<usize>,
    /// Override the Accept-Reject threshold used for labeling
    #[arg(long)]
    threshold: Option<f64>,
    /// Output CSV file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateDatasetArg) -> anyhow::Result<()> {
    let GenerateDatasetArg {
        config,
        seed,
        profiles,
        threshold,
        output,
    } = arg;

    let mut config: DatasetConfig = util::read_config_file(config.as_deref())?;
    if let Some(profiles) = profiles {
        config.profiles = *profiles;
    }
    if let Some(threshold) = threshold {
        config.acceptance_threshold = *threshold;
    }
    let total = config.total_entries();
    let seed = super::seed_or_random(*seed);
    tracing::info!(%seed, profiles = config.profiles, total, "generating dataset");

    let mut generator = DatasetGenerator::new(config, seed);
    let mut entries = Vec::with_capacity(total);
    for entry in generator.by_ref() {
        entries.push(entry);
        if entries.len() % PROGRESS_INTERVAL == 0 {
            tracing::info!(entries = entries.len(), total, "generating dataset");
        }
    }
    let progress = generator.progress();
    if progress.exhausted > 0 {
        tracing::warn!(
            exhausted = progress.exhausted,
            "some entries were labeled after exhausting their attempts"
        );
    }

    Output::save_dataset(&entries, output.clone())?;

    eprintln!("Dataset generated");
    if let Some(path) = output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Seed: {seed}");
    eprintln!("  Profiles: {}", progress.profiles);
    eprintln!("  Entries: {}", progress.entries);
    eprintln!("  Candidate rooms: {}", progress.candidates);
    eprintln!("  Exhausted: {}", progress.exhausted);

    Ok(())
}
