use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{
    classify::ClassifyArg, dungeon::DungeonArg, evaluate::EvaluateArg,
    generate_dataset::GenerateDatasetArg, train_gnb::TrainGnbArg,
};

mod classify;
mod dungeon;
mod evaluate;
mod generate_dataset;
mod train_gnb;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Generate a dungeon level and print its layout
    Dungeon(#[clap(flatten)] DungeonArg),
    /// Generate a labeled (player, room) dataset as CSV
    GenerateDataset(#[clap(flatten)] GenerateDatasetArg),
    /// Train a Gaussian Naive Bayes model on a dataset
    TrainGnb(#[clap(flatten)] TrainGnbArg),
    /// Classify every entry of a dataset and save the results
    Classify(#[clap(flatten)] ClassifyArg),
    /// Summarize the confusion matrices of results files
    Evaluate(#[clap(flatten)] EvaluateArg),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing();
    match args.mode.unwrap_or(Mode::Dungeon(DungeonArg::default())) {
        Mode::Dungeon(arg) => dungeon::run(&arg)?,
        Mode::GenerateDataset(arg) => generate_dataset::run(&arg)?,
        Mode::TrainGnb(arg) => train_gnb::run(&arg)?,
        Mode::Classify(arg) => classify::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
    }
    Ok(())
}

/// Uses `seed` when given, otherwise draws one from the thread RNG and logs it.
fn seed_or_random(seed: Option<cavern_engine::Seed>) -> cavern_engine::Seed {
    seed.unwrap_or_else(|| {
        let seed = rand::random();
        tracing::info!(%seed, "using random seed");
        seed
    })
}
