use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use cavern_analysis::evaluation::{EvaluationSummary, MetricSummary};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Results JSON files, one per session
    #[arg(required = true)]
    results: Vec<PathBuf>,
    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        results,
        json,
        output,
    } = arg;

    let sessions = results
        .iter()
        .map(util::read_results_file)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let summary = EvaluationSummary::new(&sessions);

    let mut output = Output::from_output_path(output.clone())?;
    if *json {
        return output.write_json(&summary);
    }
    write_table(&mut output, results, &summary)
        .with_context(|| format!("Failed to write summary to {}", output.display_path()))?;
    output.flush()?;
    Ok(())
}

fn write_table(
    output: &mut Output,
    paths: &[PathBuf],
    summary: &EvaluationSummary,
) -> std::io::Result<()> {
    writeln!(
        output,
        "{:<24} {:>9} {:>5} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>9}",
        "Session", "Algorithm", "TP", "TN", "FP", "FN", "Precision", "Recall", "F-score", "Dodge"
    )?;
    for (path, session) in paths.iter().zip(&summary.sessions) {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let m = &session.matrix;
        writeln!(
            output,
            "{name:<24} {:>9} {:>5} {:>5} {:>5} {:>5} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            session.algorithm,
            m.true_positive,
            m.true_negative,
            m.false_positive,
            m.false_negative,
            session.metrics.precision,
            session.metrics.recall,
            session.metrics.f_score,
            session.mean_dodge_rating,
        )?;
    }

    let t = &summary.total;
    writeln!(output)?;
    writeln!(
        output,
        "Total: TP {} / TN {} / FP {} / FN {}",
        t.true_positive, t.true_negative, t.false_positive, t.false_negative
    )?;
    writeln!(
        output,
        "Overall: precision {:.3}, recall {:.3}, F-score {:.3}",
        summary.overall.precision, summary.overall.recall, summary.overall.f_score
    )?;
    for (label, metric) in [
        ("Precision", summary.precision),
        ("Recall", summary.recall),
        ("F-score", summary.f_score),
        ("Dodge rating", summary.dodge_rating),
    ] {
        write_metric(output, label, metric)?;
    }
    Ok(())
}

fn write_metric(output: &mut Output, label: &str, metric: MetricSummary) -> std::io::Result<()> {
    writeln!(
        output,
        "{label:<13} mean {:.3} ± {:.3}",
        metric.mean, metric.std_dev
    )
}
