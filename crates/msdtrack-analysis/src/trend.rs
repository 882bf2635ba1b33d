//! Moving-average and least-squares trend lines over a strided play sequence
//!
//! The input is the `(play index, skill value)` subsequence chosen by the
//! buffer selector. Both lines are returned as viewport-space segments:
//!
//! - **Moving average**: a centered window over subsequence *positions*, see
//!   [`msdtrack_stats::smoothing`]. Drawn as a solid polyline.
//! - **Regression**: an OLS fit over the original play indices, drawn from the
//!   first to the last index of the subsequence (never extrapolated) and split
//!   into dashes.

use msdtrack_model::Skillset;
use msdtrack_stats::{
    regression::{LinearFit, RegressionParams},
    smoothing::{MovingAverageParams, centered_moving_average},
};
use serde::{Deserialize, Serialize};

use crate::geometry::{ChartFrame, DashPattern, Segment, dash_segment, polyline};

/// Tunables for trend computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Requested moving-average window, in subsequence positions.
    pub moving_average_window: usize,
    /// Cap on the number of averaged samples.
    pub max_average_points: usize,
    pub min_regression_points: usize,
    /// Regression denominators smaller than this are rejected.
    pub regression_epsilon: f64,
    pub dash: DashPattern,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            moving_average_window: 20,
            max_average_points: 100,
            min_regression_points: 3,
            regression_epsilon: 1e-4,
            dash: DashPattern::default(),
        }
    }
}

impl TrendConfig {
    #[must_use]
    pub fn moving_average_params(&self) -> MovingAverageParams {
        MovingAverageParams {
            window: self.moving_average_window,
            max_points: self.max_average_points,
            ..MovingAverageParams::default()
        }
    }

    #[must_use]
    pub fn regression_params(&self) -> RegressionParams {
        RegressionParams {
            min_points: self.min_regression_points,
            min_denominator: self.regression_epsilon,
        }
    }
}

/// A fitted trend line and its dashed rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    /// Solid line from the first to the last play index
    pub segment: Segment,
    pub dashes: Vec<Segment>,
}

/// Trend geometry for one skillset (or [`Skillset::Overall`] for all plays).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLines {
    pub skillset: Skillset,
    pub moving_average: Vec<Segment>,
    pub regression: Option<RegressionLine>,
}

impl TrendLines {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moving_average.is_empty() && self.regression.is_none()
    }

    /// Shifts every segment horizontally by `dx`.
    #[must_use]
    pub fn translated(mut self, dx: f64) -> Self {
        for segment in &mut self.moving_average {
            *segment = segment.translated(dx);
        }
        if let Some(line) = &mut self.regression {
            line.segment = line.segment.translated(dx);
            for dash in &mut line.dashes {
                *dash = dash.translated(dx);
            }
        }
        self
    }
}

/// Fits a line over `(play index, value)` samples.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn fit_trend(samples: &[(usize, f64)], config: &TrendConfig) -> Option<LinearFit> {
    LinearFit::from_points(
        samples.iter().map(|&(index, value)| (index as f64, value)),
        &config.regression_params(),
    )
}

/// Moving-average polyline for `samples`.
#[must_use]
pub fn moving_average_segments(
    samples: &[(usize, f64)],
    frame: &ChartFrame,
    config: &TrendConfig,
) -> Vec<Segment> {
    let values = samples.iter().map(|&(_, value)| value).collect::<Vec<_>>();
    let points = centered_moving_average(&values, &config.moving_average_params())
        .into_iter()
        .map(|avg| frame.project(samples[avg.position].0, avg.value))
        .collect::<Vec<_>>();
    polyline(&points)
}

/// Regression line for `samples`, spanning their first and last play index.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn regression_line(
    samples: &[(usize, f64)],
    frame: &ChartFrame,
    config: &TrendConfig,
) -> Option<RegressionLine> {
    let fit = fit_trend(samples, config)?;
    let first = samples.first()?.0;
    let last = samples.last()?.0;
    let segment = Segment::new(
        frame.project(first, fit.eval(first as f64)),
        frame.project(last, fit.eval(last as f64)),
    );
    if segment.is_degenerate() {
        return None;
    }
    Some(RegressionLine {
        slope: fit.slope,
        intercept: fit.intercept,
        segment,
        dashes: dash_segment(segment, config.dash),
    })
}

/// Computes both trend lines for one skillset.
///
/// ```
/// use msdtrack_analysis::{
///     geometry::{ChartFrame, ValueRange},
///     trend::{TrendConfig, compute_trend},
///     viewport::ViewState,
/// };
/// use msdtrack_model::Skillset;
///
/// let samples = (0..10).map(|i| (i, 10.0 + i as f64)).collect::<Vec<_>>();
/// let frame = ChartFrame { count: 10, view: ViewState::default(), range: ValueRange::new(10.0, 19.0) };
/// let trend = compute_trend(Skillset::Overall, &samples, &frame, &TrendConfig::default());
/// let line = trend.regression.unwrap();
/// assert_eq!(line.slope, 1.0);
/// assert_eq!(line.segment.start.y, 0.0);
/// assert_eq!(line.segment.end.y, 1.0);
/// ```
#[must_use]
pub fn compute_trend(
    skillset: Skillset,
    samples: &[(usize, f64)],
    frame: &ChartFrame,
    config: &TrendConfig,
) -> TrendLines {
    TrendLines {
        skillset,
        moving_average: moving_average_segments(samples, frame, config),
        regression: regression_line(samples, frame, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::ValueRange,
        viewport::{ViewState, ViewportConfig},
    };

    fn frame(count: usize) -> ChartFrame {
        ChartFrame {
            count,
            view: ViewState::default(),
            range: ValueRange::new(0.0, 10.0),
        }
    }

    #[test]
    fn test_colinear_fit_is_exact() {
        let fit = fit_trend(&[(0, 1.0), (1, 2.0), (2, 3.0)], &TrendConfig::default()).unwrap();
        assert_eq!(fit.slope, 1.0);
        assert_eq!(fit.intercept, 1.0);
    }

    #[test]
    fn test_fit_uses_play_index_not_position() {
        // Strided subsequence: positions 0..3 but play indices 0, 10, 20
        let fit = fit_trend(&[(0, 1.0), (10, 2.0), (20, 3.0)], &TrendConfig::default()).unwrap();
        assert_eq!(fit.slope, 0.1);
    }

    #[test]
    fn test_insufficient_data() {
        let trend = compute_trend(
            Skillset::Stream,
            &[(0, 1.0), (1, 2.0)],
            &frame(2),
            &TrendConfig::default(),
        );
        assert!(trend.is_empty());
    }

    #[test]
    fn test_regression_spans_observed_range_only() {
        let samples = [(40, 5.0), (50, 5.0), (60, 5.0)];
        let frame = frame(101);
        let line = regression_line(&samples, &frame, &TrendConfig::default()).unwrap();
        assert!((line.segment.start.x - 0.4).abs() < 1e-12);
        assert!((line.segment.end.x - 0.6).abs() < 1e-12);
        assert_eq!(line.segment.start.y, 0.5);
        assert!(!line.dashes.is_empty());
    }

    #[test]
    fn test_regression_y_is_clamped() {
        let samples = [(0, 0.0), (1, 50.0), (2, 100.0)];
        let line = regression_line(&samples, &frame(3), &TrendConfig::default()).unwrap();
        assert_eq!(line.segment.start.y, 0.0);
        assert_eq!(line.segment.end.y, 1.0);
    }

    #[test]
    fn test_moving_average_follows_window() {
        let samples = (0..50).map(|i| (i * 2, 4.0)).collect::<Vec<_>>();
        let segments = moving_average_segments(&samples, &frame(100), &TrendConfig::default());
        assert_eq!(segments.len(), 49);
        assert!(segments.iter().all(|s| s.start.y == 0.4 && s.end.y == 0.4));
    }

    #[test]
    fn test_translated_moves_all_geometry() {
        let samples = (0..20_u32)
            .map(|i| (usize::try_from(i).unwrap(), f64::from(i % 5)))
            .collect::<Vec<_>>();
        let view = ViewState::new(2.0, 0.25, &ViewportConfig::default());
        let frame = ChartFrame {
            count: 20,
            view,
            range: ValueRange::new(0.0, 4.0),
        };
        let trend = compute_trend(Skillset::Overall, &samples, &frame, &TrendConfig::default());
        let shifted = trend.clone().translated(-0.5);
        assert_eq!(trend.moving_average.len(), shifted.moving_average.len());
        let before = trend.regression.unwrap();
        let after = shifted.regression.unwrap();
        assert!((before.segment.start.x - 0.5 - after.segment.start.x).abs() < 1e-12);
        assert_eq!(before.dashes.len(), after.dashes.len());
    }
}
