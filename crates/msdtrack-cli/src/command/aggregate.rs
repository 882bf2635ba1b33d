use std::path::PathBuf;

use msdtrack_dan::{DanReference, TrainingSet};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AggregateArg {
    /// JSON array of dan references, easiest first
    dans: PathBuf,
    /// JSON array of labelled training samples
    samples: PathBuf,
    /// Output file path for the per-dan aggregates (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Write a dan table with populated tiers replaced by their sample means
    #[arg(long)]
    tuned_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AggregateArg) -> anyhow::Result<()> {
    let AggregateArg {
        dans,
        samples,
        output,
        tuned_output,
    } = arg;

    let references = util::read_dans_file(dans)?;
    let set: TrainingSet = util::read_json_file("training samples", samples)?;
    tracing::info!(samples = set.len(), "loaded training samples");

    let aggregates = set.aggregate_for(&references);
    let populated = aggregates.iter().filter(|a| a.is_summary()).count();
    tracing::info!(
        dans = references.len(),
        populated,
        "aggregated training samples"
    );
    Output::save_json(&aggregates, output.as_deref())?;

    if let Some(path) = tuned_output {
        let tuned = references
            .iter()
            .zip(&aggregates)
            .map(|(reference, aggregate)| {
                aggregate
                    .to_reference()
                    .unwrap_or_else(|| reference.clone())
            })
            .collect::<Vec<DanReference>>();
        Output::save_json(&tuned, Some(path.as_path()))?;
    }

    Ok(())
}
