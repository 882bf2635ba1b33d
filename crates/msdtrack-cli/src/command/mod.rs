use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{
    aggregate::AggregateArg,
    chart::ChartArg,
    classify::ClassifyArg,
    curve::{CurveDefaultArg, FitCurveArg},
};
use crate::config::AnalyticsConfig;

mod aggregate;
mod chart;
mod classify;
mod curve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// JSON file overriding the default analytics configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Materialize chart geometry for a view of the play history
    Chart(#[clap(flatten)] ChartArg),
    /// Fit a session curve to the play history
    FitCurve(#[clap(flatten)] FitCurveArg),
    /// Print the canonical session curve
    CurveDefault(#[clap(flatten)] CurveDefaultArg),
    /// Classify a skill vector against a dan table
    Classify(#[clap(flatten)] ClassifyArg),
    /// Aggregate training samples per dan
    Aggregate(#[clap(flatten)] AggregateArg),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing();
    let config = AnalyticsConfig::load(args.config.as_deref())?;
    match args.mode {
        Mode::Chart(arg) => chart::run(&arg, &config)?,
        Mode::FitCurve(arg) => curve::run_fit(&arg)?,
        Mode::CurveDefault(arg) => curve::run_default(&arg)?,
        Mode::Classify(arg) => classify::run(&arg, &config)?,
        Mode::Aggregate(arg) => aggregate::run(&arg)?,
    }
    Ok(())
}
