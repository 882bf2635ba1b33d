//! Zoom/pan state and the mapping between play indices and viewport space
//!
//! A history of `count` plays is laid out on the normalized axis `[0, 1]`
//! (`index / (count - 1)`). The visible window is `view_width = 1 / zoom`
//! wide and starts at `offset`, so a play maps to viewport x as
//!
//! ```text
//! x = (index / (count - 1) - offset) / view_width
//! ```
//!
//! x is deliberately left unclamped: plays outside the window land outside
//! `[0, 1]`, which lets the renderer translate already-built geometry while
//! panning.
//!
//! [`ViewState`] is an immutable value. [`ViewState::zoom_at`] and
//! [`ViewState::pan_by`] return a new state, so a reader holding an older
//! state always sees a consistent (zoom, offset) pair.

use serde::{Deserialize, Serialize};

/// Zoom limits and step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Smallest zoom level; values below 1.0 are treated as 1.0.
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fractional zoom change per scroll notch.
    pub zoom_step: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 50.0,
            zoom_step: 0.15,
        }
    }
}

impl ViewportConfig {
    /// Effective `(min, max)` zoom, with `1 <= min <= max`.
    #[must_use]
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let min = if self.min_zoom.is_finite() {
            self.min_zoom.max(1.0)
        } else {
            1.0
        };
        let max = if self.max_zoom.is_nan() {
            min
        } else {
            self.max_zoom.max(min)
        };
        (min, max)
    }
}

/// Direction of a zoom gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    In,
    Out,
}

impl ScrollDirection {
    /// Positive wheel deltas zoom in; zero and negative deltas zoom out.
    #[must_use]
    pub fn from_wheel_delta(delta: f64) -> Self {
        if delta > 0.0 { Self::In } else { Self::Out }
    }
}

/// Zoom level and horizontal offset of the visible window.
///
/// Invariant: `1 <= zoom` and `0 <= offset <= 1 - 1/zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewState {
    zoom: f64,
    offset: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: 0.0,
        }
    }
}

impl ViewState {
    /// Builds a state, clamping `zoom` into the configured bounds and
    /// `offset` into its valid range.
    #[must_use]
    pub fn new(zoom: f64, offset: f64, config: &ViewportConfig) -> Self {
        let (min, max) = config.zoom_bounds();
        let zoom = if zoom.is_nan() { min } else { zoom.clamp(min, max) };
        Self {
            zoom,
            offset: clamp_offset(offset, zoom),
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Width of the visible window on the normalized axis.
    #[must_use]
    pub fn view_width(&self) -> f64 {
        1.0 / self.zoom
    }

    /// Normalized position of the viewport center.
    #[must_use]
    pub fn center(&self) -> f64 {
        self.offset + self.view_width() / 2.0
    }

    /// Largest valid offset for the current zoom.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (1.0 - self.view_width()).max(0.0)
    }

    /// Zooms one step in or out, keeping the data under `mouse_rel_x` fixed.
    ///
    /// `mouse_rel_x` is the cursor position inside the viewport (0 = left
    /// edge, 1 = right edge) and is clamped to that range.
    ///
    /// ```
    /// use msdtrack_analysis::viewport::{ScrollDirection, ViewState, ViewportConfig};
    ///
    /// let config = ViewportConfig::default();
    /// let view = ViewState::default().zoom_at(0.5, ScrollDirection::In, &config);
    /// assert_eq!(view.zoom(), 1.15);
    /// // Zooming about the center keeps the center in place.
    /// assert!((view.center() - 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn zoom_at(self, mouse_rel_x: f64, direction: ScrollDirection, config: &ViewportConfig) -> Self {
        let mouse = if mouse_rel_x.is_nan() {
            0.5
        } else {
            mouse_rel_x.clamp(0.0, 1.0)
        };
        let anchor = self.offset + mouse * self.view_width();
        let factor = match direction {
            ScrollDirection::In => 1.0 + config.zoom_step,
            ScrollDirection::Out => 1.0 - config.zoom_step,
        };
        let zoom = self.zoom * factor;
        let (min, max) = config.zoom_bounds();
        let zoom = if zoom.is_nan() { self.zoom } else { zoom.clamp(min, max) };
        let offset = anchor - mouse / zoom;
        Self {
            zoom,
            offset: clamp_offset(offset, zoom),
        }
    }

    /// Pans by `delta` view widths (positive moves right).
    #[must_use]
    pub fn pan_by(self, delta: f64) -> Self {
        let offset = self.offset + delta * self.view_width();
        Self {
            zoom: self.zoom,
            offset: clamp_offset(offset, self.zoom),
        }
    }
}

fn clamp_offset(offset: f64, zoom: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    let max = (1.0 - 1.0 / zoom).max(0.0);
    offset.clamp(0.0, max)
}

/// Position of play `index` on the normalized `[0, 1]` axis.
///
/// Histories with at most one play put everything at the midpoint.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn normalized_position(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.5
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Viewport x of play `index` in a history of `count` plays. Not clamped.
///
/// ```
/// use msdtrack_analysis::viewport::{ViewState, ViewportConfig, index_to_viewport_x};
///
/// let view = ViewState::new(2.0, 0.25, &ViewportConfig::default());
/// assert_eq!(index_to_viewport_x(50, 101, view), 0.5);
/// assert_eq!(index_to_viewport_x(0, 101, view), -0.5);
/// ```
#[must_use]
pub fn index_to_viewport_x(index: usize, count: usize, view: ViewState) -> f64 {
    let raw = normalized_position(index, count);
    (raw - view.offset) / view.view_width()
}

/// Index of the play nearest to viewport x, clamped to `[0, count - 1]`.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn viewport_x_to_index(x: f64, count: usize, view: ViewState) -> usize {
    if count <= 1 {
        return 0;
    }
    let raw = x * view.view_width() + view.offset;
    let last = count - 1;
    let index = (raw * last as f64).round();
    if index.is_nan() || index <= 0.0 {
        0
    } else if index >= last as f64 {
        last
    } else {
        index as usize
    }
}
