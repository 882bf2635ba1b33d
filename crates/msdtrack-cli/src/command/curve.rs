use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use msdtrack_analysis::{
    curve::{DEFAULT_DURATION_MINUTES, SkillCurveModel},
    curve_fit,
};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FitCurveArg {
    /// JSON array of plays, oldest first
    plays: PathBuf,
    /// Overall rating used as the curve base instead of the session mean
    #[arg(long)]
    overall_rating: Option<f64>,
    /// Number of sampling steps across the session
    #[arg(long, default_value_t = 20)]
    samples: u32,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CurveDefaultArg {
    /// Skill value the curve offsets are relative to
    #[arg(long)]
    base_value: f64,
    /// Session length in minutes
    #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
    minutes: NonZeroU32,
    /// Number of sampling steps across the session
    #[arg(long, default_value_t = 20)]
    samples: u32,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CurveSample {
    time_percent: f64,
    minutes: f64,
    value: f64,
}

#[derive(Debug, Serialize)]
struct CurveOutput<'a> {
    curve: &'a SkillCurveModel,
    samples: Vec<CurveSample>,
}

fn save_curve(curve: &SkillCurveModel, steps: u32, output: Option<&Path>) -> anyhow::Result<()> {
    let samples = curve
        .sample(steps)
        .into_iter()
        .map(|(time_percent, value)| CurveSample {
            time_percent,
            minutes: curve.minutes_from_percent(time_percent),
            value,
        })
        .collect();
    Output::save_json(&CurveOutput { curve, samples }, output)
}

pub(crate) fn run_fit(arg: &FitCurveArg) -> anyhow::Result<()> {
    let FitCurveArg {
        plays,
        overall_rating,
        samples,
        output,
    } = arg;

    let history = util::read_plays_file(plays)?;
    let curve = curve_fit::fit_curve_from_history(&history, *overall_rating)
        .with_context(|| format!("Failed to fit a session curve to {}", plays.display()))?;
    tracing::info!(
        base = curve.base_value(),
        minutes = curve.total_duration_minutes(),
        "fitted session curve"
    );

    save_curve(&curve, *samples, output.as_deref())
}

pub(crate) fn run_default(arg: &CurveDefaultArg) -> anyhow::Result<()> {
    let CurveDefaultArg {
        base_value,
        minutes,
        samples,
        output,
    } = arg;

    let curve = SkillCurveModel::default_shape(*base_value, *minutes)
        .with_context(|| format!("Invalid base value: {base_value}"))?;
    save_curve(&curve, *samples, output.as_deref())
}
