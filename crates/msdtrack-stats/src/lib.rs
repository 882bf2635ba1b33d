//! Numeric kernels for the msdtrack analytics workspace.
//!
//! This crate has no dependencies and knows nothing about plays or charts; it
//! only operates on plain `f64` sequences:
//!
//! - **Descriptive statistics**: count, min, max, mean
//! - **Regression**: ordinary least-squares line fitting with degeneracy guards
//! - **Smoothing**: centered moving average over positional neighbors
//! - **Binning**: fixed-width bins with an inclusive upper edge
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`regression`]: Least-squares fitting of a straight line
//! - [`smoothing`]: Centered moving averages with a bounded output size
//! - [`binning`]: Fixed-width bucketing of keyed items
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use msdtrack_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Fitting a trend line
//!
//! ```
//! use msdtrack_stats::regression::{LinearFit, RegressionParams};
//!
//! let points = [(0.0, 2.0), (1.0, 4.0), (2.0, 6.0), (3.0, 8.0)];
//! let fit = LinearFit::from_points(points, &RegressionParams::default()).unwrap();
//! assert_eq!(fit.slope, 2.0);
//! ```

pub mod binning;
pub mod descriptive;
pub mod regression;
pub mod smoothing;
