//! Viewport geometry, trend lines and session curve modelling for play histories.
//!
//! This crate turns a [`PlayHistory`](msdtrack_model::PlayHistory) into the
//! numbers a skill progression chart needs. It performs no I/O and draws
//! nothing; every function is a pure computation over immutable inputs.
//!
//! # Architecture
//!
//! ```text
//! viewport   (index <-> viewport x, zoom / pan state)
//!     ↓
//! buffer     (which indices to materialize, when to rebuild)
//!     ↓
//! trend      (moving average + dashed regression, via geometry)
//!     ↓
//! chart      (tagged scatter points and trends for one view)
//!
//! curve      (piecewise-linear session curve)
//!     ↑
//! curve_fit  (curve fitted from historical sessions)
//! ```
//!
//! # Modules
//!
//! - [`viewport`]: [`ViewState`](viewport::ViewState) transitions and the index mapping
//! - [`buffer`]: buffer window selection and the [`RenderCache`](buffer::RenderCache)
//! - [`geometry`]: points, segments, value normalization and dashing
//! - [`trend`]: moving-average and regression trend lines
//! - [`chart`]: full chart materialization
//! - [`curve`]: [`SkillCurveModel`](curve::SkillCurveModel)
//! - [`curve_fit`]: [`fit_curve_from_history`](curve_fit::fit_curve_from_history)
//!
//! # Example
//!
//! ```
//! use msdtrack_analysis::viewport::{ScrollDirection, ViewState, ViewportConfig, index_to_viewport_x};
//!
//! let config = ViewportConfig::default();
//! let view = ViewState::default()
//!     .zoom_at(1.0, ScrollDirection::In, &config)
//!     .pan_by(-1.0);
//! assert_eq!(view.offset(), 0.0);
//! assert_eq!(index_to_viewport_x(0, 100, view), 0.0);
//! ```

pub mod buffer;
pub mod chart;
pub mod curve;
pub mod curve_fit;
pub mod geometry;
pub mod trend;
pub mod viewport;
