use std::path::PathBuf;

use msdtrack_analysis::{
    chart::{ChartGeometry, SkillChart},
    viewport::{ScrollDirection, ViewState, ViewportConfig},
};
use serde::Serialize;

use crate::{
    config::AnalyticsConfig,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ChartArg {
    /// JSON array of plays, oldest first
    plays: PathBuf,
    /// Zoom level of the starting view
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    /// Left edge of the starting view as a fraction of the history
    #[arg(long, default_value_t = 0.0)]
    offset: f64,
    /// Wheel delta to apply at `--cursor` (positive zooms in, zero or negative zooms out)
    #[arg(long, allow_hyphen_values = true)]
    scroll: Option<f64>,
    /// Cursor position within the viewport for `--scroll`, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    cursor: f64,
    /// Pan distance in view widths applied after zooming
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan: f64,
    /// Center the geometry was last materialized around (defaults to the view center)
    #[arg(long)]
    rendered_center: Option<f64>,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ChartOutput {
    view: ViewState,
    rendered_center: f64,
    geometry: ChartGeometry,
}

impl ChartArg {
    /// Starting view after the optional scroll gesture and pan.
    fn view(&self, viewport: &ViewportConfig) -> ViewState {
        let mut view = ViewState::new(self.zoom, self.offset, viewport);
        if let Some(delta) = self.scroll {
            view = view.zoom_at(
                self.cursor,
                ScrollDirection::from_wheel_delta(delta),
                viewport,
            );
        }
        view.pan_by(self.pan)
    }
}

pub(crate) fn run(arg: &ChartArg, config: &AnalyticsConfig) -> anyhow::Result<()> {
    let history = util::read_plays_file(&arg.plays)?;
    let view = arg.view(&config.chart.viewport);
    let rendered_center = arg.rendered_center.unwrap_or_else(|| view.center());

    let geometry = SkillChart::materialize(&history, view, rendered_center, &config.chart);
    tracing::info!(
        zoom = view.zoom(),
        offset = view.offset(),
        points = geometry.points.len(),
        "materialized chart"
    );

    Output::save_json(
        &ChartOutput {
            view,
            rendered_center,
            geometry,
        },
        arg.output.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(zoom: f64, offset: f64, scroll: Option<f64>, pan: f64) -> ChartArg {
        ChartArg {
            plays: PathBuf::from("plays.json"),
            zoom,
            offset,
            scroll,
            cursor: 0.5,
            pan,
            rendered_center: None,
            output: None,
        }
    }

    #[test]
    fn test_pan_is_in_view_widths() {
        let viewport = ViewportConfig::default();
        let view = arg(10.0, 0.3, None, 1.0).view(&viewport);
        assert!((view.offset() - 0.4).abs() < 1e-12);
        let view = arg(10.0, 0.3, None, -0.5).view(&viewport);
        assert!((view.offset() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_positive_scroll_zooms_in() {
        let viewport = ViewportConfig::default();
        assert!(arg(2.0, 0.0, Some(1.0), 0.0).view(&viewport).zoom() > 2.0);
        assert!(arg(2.0, 0.0, Some(-1.0), 0.0).view(&viewport).zoom() < 2.0);
        assert_eq!(arg(2.0, 0.0, None, 0.0).view(&viewport).zoom(), 2.0);
    }
}
