use std::path::PathBuf;

use anyhow::Context as _;
use cavern_engine::{
    Seed,
    generation::{Dungeon, DungeonConfig},
};

use crate::{
    model::layout::LayoutFile,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DungeonArg {
    /// Dungeon config JSON file; defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// 1-based dungeon level selecting the feature budgets
    #[arg(long, default_value_t = 1)]
    level: usize,
    /// Seed of the level; random when omitted
    #[arg(long)]
    seed: Option<Seed>,
    /// Override the grid width
    #[arg(long)]
    width: Option<usize>,
    /// Override the grid height
    #[arg(long)]
    height: Option<usize>,
    /// Override the number of interior rooms
    #[arg(long)]
    rooms: Option<usize>,
    /// Print the final grid as ASCII instead of JSON
    #[arg(long)]
    ascii: bool,
    /// Include every smoothing snapshot in the JSON output
    #[arg(long)]
    history: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DungeonArg) -> anyhow::Result<()> {
    let DungeonArg {
        config,
        level,
        seed,
        width,
        height,
        rooms,
        ascii,
        history,
        output,
    } = arg;

    let mut config: DungeonConfig = util::read_config_file(config.as_deref())?;
    if let Some(width) = width {
        config.width = *width;
    }
    if let Some(height) = height {
        config.height = *height;
    }
    if let Some(rooms) = rooms {
        config.room_count = *rooms;
    }

    let seed = super::seed_or_random(*seed);
    let dungeon = Dungeon::generate(&config, *level, seed)
        .with_context(|| format!("Failed to generate level {level} from seed {seed}"))?;
    if !dungeon.layout.outcome.is_complete() {
        tracing::warn!(outcome = ?dungeon.layout.outcome, "room graph is incomplete");
    }

    let mut output = Output::from_output_path(output.clone())?;
    if *ascii {
        output.write_lines(dungeon.layout.grid.to_ascii_rows())?;
    } else {
        output.write_json(LayoutFile::new(&dungeon, *history))?;
    }

    let graph = &dungeon.layout.graph;
    eprintln!("Level {level} generated");
    eprintln!("  Seed: {seed}");
    eprintln!("  Rooms: {} ({} interior)", graph.len(), graph.interior_count());
    eprintln!("  Doors: {}", graph.door_count());
    eprintln!("  Output: {}", output.display_path());

    Ok(())
}
