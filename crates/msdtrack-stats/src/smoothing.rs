//! Centered moving average over positional neighbors
//!
//! The window is measured in sequence positions, not in time: the sample at
//! position `i` is averaged with every value whose position lies within
//! `±window/2` of `i`. Windows are truncated at the sequence boundary (no
//! wraparound and no padding), so edge samples average fewer values.
//!
//! The effective window is `max(min_window, min(window, len / 5))`, which keeps
//! short sequences from being flattened into a single plateau. Output samples
//! are themselves strided so that at most `max_points` averages are produced.
//!
//! # Examples
//!
//! ```
//! use msdtrack_stats::smoothing::{MovingAverageParams, centered_moving_average};
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let averaged = centered_moving_average(&values, &MovingAverageParams::default());
//! // window = 3, so the first sample averages positions 0..=1
//! assert_eq!(averaged[0].value, 1.5);
//! assert_eq!(averaged[2].value, 3.0);
//! assert_eq!(averaged.len(), 5);
//! ```

/// Tunables for [`centered_moving_average`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageParams {
    /// Requested window size in positions.
    pub window: usize,
    /// Lower bound on the effective window.
    pub min_window: usize,
    /// Upper bound on the number of averaged samples produced.
    pub max_points: usize,
}

impl Default for MovingAverageParams {
    fn default() -> Self {
        Self {
            window: 20,
            min_window: 3,
            max_points: 100,
        }
    }
}

impl MovingAverageParams {
    /// Effective window size for a sequence of `len` values.
    #[must_use]
    pub fn effective_window(&self, len: usize) -> usize {
        self.window.min(len / 5).max(self.min_window)
    }

    /// Stride between averaged samples for a sequence of `len` values.
    #[must_use]
    pub fn sample_stride(&self, len: usize) -> usize {
        len.div_ceil(self.max_points.max(1)).max(1)
    }
}

/// One averaged sample, keyed by its position in the input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AveragedPoint {
    pub position: usize,
    pub value: f64,
}

/// Computes a centered moving average of `values`.
///
/// Returns an empty vector when `values` has fewer than `params.min_window`
/// elements.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn centered_moving_average(values: &[f64], params: &MovingAverageParams) -> Vec<AveragedPoint> {
    let len = values.len();
    if len == 0 || len < params.min_window {
        return vec![];
    }

    let half = params.effective_window(len) / 2;
    let stride = params.sample_stride(len);

    (0..len)
        .step_by(stride)
        .map(|position| {
            let start = position.saturating_sub(half);
            let end = (position + half).min(len - 1);
            let window = &values[start..=end];
            let value = window.iter().sum::<f64>() / window.len() as f64;
            AveragedPoint { position, value }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short() {
        let averaged = centered_moving_average(&[1.0, 2.0], &MovingAverageParams::default());
        assert!(averaged.is_empty());
    }

    #[test]
    fn test_effective_window_bounds() {
        let params = MovingAverageParams::default();
        assert_eq!(params.effective_window(10), 3);
        assert_eq!(params.effective_window(50), 10);
        assert_eq!(params.effective_window(1000), 20);
    }

    #[test]
    fn test_edges_are_truncated() {
        let values = (0..50).map(f64::from).collect::<Vec<_>>();
        let averaged = centered_moving_average(&values, &MovingAverageParams::default());
        // window = 10, half = 5
        assert_eq!(averaged[0].value, f64::from((0..=5).sum::<i32>()) / 6.0);
        assert_eq!(averaged[25].value, 25.0);
        assert_eq!(averaged[49].value, f64::from((44..=49).sum::<i32>()) / 6.0);
    }

    #[test]
    fn test_sample_count_is_capped() {
        let values = vec![1.0; 1000];
        let averaged = centered_moving_average(&values, &MovingAverageParams::default());
        assert_eq!(averaged.len(), 100);
        assert_eq!(averaged[1].position, 10);
        assert!(averaged.iter().all(|p| p.value == 1.0));
    }

    #[test]
    fn test_uneven_cap() {
        let values = vec![2.0; 250];
        let averaged = centered_moving_average(&values, &MovingAverageParams::default());
        // stride = ceil(250 / 100) = 3
        assert_eq!(averaged.len(), 84);
        assert!(averaged.len() <= 100);
    }
}
