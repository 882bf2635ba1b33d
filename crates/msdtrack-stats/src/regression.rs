//! Ordinary least-squares line fitting
//!
//! Fits `y = slope * x + intercept` to a set of `(x, y)` observations using
//! the closed-form normal equations:
//!
//! ```text
//! slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//! intercept = (Σy − slope·Σx) / n
//! ```
//!
//! The fit is refused (returns `None`) when there are too few observations or
//! when the denominator is so close to zero that the slope would blow up,
//! e.g. when every `x` is identical.
//!
//! # Examples
//!
//! ```
//! use msdtrack_stats::regression::{LinearFit, RegressionParams};
//!
//! let fit = LinearFit::from_points([(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)], &RegressionParams::default())
//!     .unwrap();
//! assert_eq!(fit.slope, 1.0);
//! assert_eq!(fit.intercept, 1.0);
//! assert_eq!(fit.eval(10.0), 11.0);
//! ```

/// Guards applied before a fit is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionParams {
    /// Minimum number of observations required.
    pub min_points: usize,
    /// Fits whose `|n·Σx² − (Σx)²|` is below this are rejected as degenerate.
    pub min_denominator: f64,
}

impl Default for RegressionParams {
    fn default() -> Self {
        Self {
            min_points: 3,
            min_denominator: 1e-4,
        }
    }
}

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations the line was fitted to.
    pub count: usize,
}

impl LinearFit {
    /// Fits a line to `points`.
    ///
    /// Returns `None` when fewer than `params.min_points` observations are
    /// given or the system is degenerate.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_points<I>(points: I, params: &RegressionParams) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut count = 0_usize;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        for (x, y) in points {
            count += 1;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        if count < params.min_points.max(2) {
            return None;
        }

        let n = count as f64;
        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator.abs() < params.min_denominator {
            return None;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;
        (slope.is_finite() && intercept.is_finite()).then_some(Self {
            slope,
            intercept,
            count,
        })
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
