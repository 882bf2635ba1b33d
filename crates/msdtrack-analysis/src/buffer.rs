//! Buffered index windows and the translate-or-rematerialize decision
//!
//! Rebuilding chart geometry on every pan is wasteful, so geometry is built for
//! a window three view-widths wide (1.5 widths each side of the center it was
//! built around, the *rendered center*). While the viewport center stays
//! within `rematerialize_fraction` view widths of that rendered center the
//! caller just shifts the existing geometry; once it drifts further the window
//! is rebuilt around the new center.
//!
//! Inside the window plays are strided so the number of materialized points
//! stays near `max_visible_points * zoom` no matter how long the history is.
//!
//! ```text
//!   rendered_center
//!         │
//! ├───────┼───────┤  buffer window (3 view widths)
//!     ├───┼───┤      visible window (1 view width)
//! ```

use std::{iter::StepBy, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::viewport::ViewState;

/// Tunables for buffer selection and re-materialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// On-screen point budget at zoom 1.
    pub max_visible_points: usize,
    /// Buffer extent on each side of the rendered center, in view widths.
    pub buffer_factor: f64,
    /// Center drift, in view widths, that forces a rebuild.
    pub rematerialize_fraction: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_visible_points: 500,
            buffer_factor: 1.5,
            rematerialize_fraction: 0.8,
        }
    }
}

/// A strided, inclusive range of play indices to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferWindow {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub stride: usize,
    /// Normalized center the window was built around
    pub rendered_center: f64,
    /// Zoom level the window was built for
    pub zoom: f64,
}

impl BufferWindow {
    /// The selected indices, `start, start + stride, ...` up to `end`.
    #[must_use]
    pub fn indices(&self) -> StepBy<RangeInclusive<usize>> {
        (self.start..=self.end).step_by(self.stride)
    }

    /// Number of indices yielded by [`BufferWindow::indices`]; never zero.
    #[must_use]
    pub fn point_count(&self) -> usize {
        (self.end - self.start) / self.stride + 1
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Computes the buffer window around `rendered_center` for `count` plays.
///
/// Returns `None` for an empty history.
///
/// ```
/// use msdtrack_analysis::{
///     buffer::{BufferConfig, select_buffer_window},
///     viewport::{ViewState, ViewportConfig},
/// };
///
/// let view = ViewState::new(10.0, 0.45, &ViewportConfig::default());
/// let window = select_buffer_window(view, view.center(), 501, &BufferConfig::default()).unwrap();
/// assert_eq!((window.start, window.end, window.stride), (175, 325, 1));
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn select_buffer_window(
    view: ViewState,
    rendered_center: f64,
    count: usize,
    config: &BufferConfig,
) -> Option<BufferWindow> {
    if count == 0 {
        return None;
    }
    let rendered_center = if rendered_center.is_nan() {
        view.center()
    } else {
        rendered_center.clamp(0.0, 1.0)
    };
    let view_width = view.view_width();
    let half_extent = config.buffer_factor * view_width;
    let buffer_start = (rendered_center - half_extent).max(0.0);
    let buffer_end = (rendered_center + half_extent).min(1.0);

    let last = count - 1;
    let start = ((buffer_start * last as f64).floor() as usize).min(last);
    let end = ((buffer_end * last as f64).ceil() as usize).clamp(start, last);

    let target = ((config.max_visible_points as f64 * view.zoom().max(1.0)) as usize).max(1);
    let stride = ((end - start + 1) / target).max(1);

    Some(BufferWindow {
        start,
        end,
        stride,
        rendered_center,
        zoom: view.zoom(),
    })
}

/// Whether the viewport has drifted far enough from `rendered_center` that the
/// buffer must be rebuilt.
#[must_use]
pub fn needs_rematerialization(view: ViewState, rendered_center: f64, config: &BufferConfig) -> bool {
    (view.center() - rendered_center).abs() > config.rematerialize_fraction * view.view_width()
}

/// What the renderer should do for the current view.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum RenderAction {
    /// Nothing to draw.
    Empty,
    /// Existing geometry is still valid; shift every x by `translation`.
    Reuse { translation: f64 },
    /// Rebuild geometry for this window.
    Rematerialize(BufferWindow),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    rendered_center: f64,
    zoom: f64,
    count: usize,
}

/// Tracks the last materialized window and decides between reuse and rebuild.
///
/// The cache is keyed by `(rendered_center, zoom, count)`; any zoom or count
/// change rebuilds, and so does a center drift beyond the configured fraction.
/// Each rebuild bumps [`RenderCache::generation`], which callers can use to
/// tag geometry.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    key: Option<CacheKey>,
    generation: u64,
}

impl RenderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn rendered_center(&self) -> Option<f64> {
        self.key.map(|key| key.rendered_center)
    }

    /// Forgets the cached window so the next update rebuilds.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    #[expect(clippy::float_cmp)]
    pub fn update(&mut self, view: ViewState, count: usize, config: &BufferConfig) -> RenderAction {
        if count == 0 {
            self.key = None;
            return RenderAction::Empty;
        }

        let reusable = self.key.filter(|key| {
            key.zoom == view.zoom()
                && key.count == count
                && !needs_rematerialization(view, key.rendered_center, config)
        });
        if let Some(key) = reusable {
            let translation = -(view.center() - key.rendered_center) / view.view_width();
            return RenderAction::Reuse { translation };
        }

        let rendered_center = view.center();
        let Some(window) = select_buffer_window(view, rendered_center, count, config) else {
            return RenderAction::Empty;
        };
        self.key = Some(CacheKey {
            rendered_center: window.rendered_center,
            zoom: window.zoom,
            count,
        });
        self.generation += 1;
        tracing::trace!(
            generation = self.generation,
            start = window.start,
            end = window.end,
            stride = window.stride,
            "rematerializing chart buffer"
        );
        RenderAction::Rematerialize(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportConfig;

    fn view(zoom: f64, offset: f64) -> ViewState {
        ViewState::new(zoom, offset, &ViewportConfig::default())
    }

    #[test]
    fn test_empty_history() {
        let config = BufferConfig::default();
        assert!(select_buffer_window(ViewState::default(), 0.5, 0, &config).is_none());
        let mut cache = RenderCache::new();
        assert_eq!(cache.update(ViewState::default(), 0, &config), RenderAction::Empty);
    }

    #[test]
    fn test_single_play() {
        let window =
            select_buffer_window(ViewState::default(), 0.5, 1, &BufferConfig::default()).unwrap();
        assert_eq!((window.start, window.end, window.stride), (0, 0, 1));
        assert_eq!(window.indices().collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn test_fully_zoomed_out_covers_everything() {
        let window =
            select_buffer_window(ViewState::default(), 0.5, 500, &BufferConfig::default()).unwrap();
        assert_eq!((window.start, window.end, window.stride), (0, 499, 1));
    }

    #[test]
    fn test_large_history_is_strided() {
        let window =
            select_buffer_window(ViewState::default(), 0.5, 100_001, &BufferConfig::default())
                .unwrap();
        assert_eq!(window.stride, 200);
        assert_eq!(window.point_count(), 501);
        assert_eq!(window.indices().count(), window.point_count());
    }

    #[test]
    fn test_budget_scales_with_zoom() {
        let config = BufferConfig {
            max_visible_points: 10,
            ..BufferConfig::default()
        };
        let count = 10_001;
        let zoomed_out = select_buffer_window(view(1.0, 0.0), 0.5, count, &config).unwrap();
        let zoomed_in = select_buffer_window(view(4.0, 0.375), 0.5, count, &config).unwrap();
        assert_eq!(zoomed_out.stride, 1000);
        // 3/4 of the history in the buffer, 40 point budget
        assert_eq!(zoomed_in.start, 1250);
        assert_eq!(zoomed_in.end, 8750);
        assert_eq!(zoomed_in.stride, 187);
    }

    #[test]
    fn test_window_is_clipped_at_edges() {
        let v = view(10.0, 0.9);
        let window = select_buffer_window(v, v.center(), 1234, &BufferConfig::default()).unwrap();
        assert_eq!(window.end, 1233);
        assert_eq!(window.start, 986);
    }

    #[test]
    fn test_out_of_range_center_is_clamped() {
        let window =
            select_buffer_window(view(10.0, 0.0), 5.0, 101, &BufferConfig::default()).unwrap();
        assert_eq!(window.rendered_center, 1.0);
        assert!(window.start <= window.end);
        assert_eq!(window.end, 100);
    }

    #[test]
    fn test_needs_rematerialization_threshold() {
        let config = BufferConfig::default();
        let v = view(10.0, 0.45);
        assert!(!needs_rematerialization(v, 0.5, &config));
        assert!(!needs_rematerialization(v, 0.5 + 0.079, &config));
        assert!(needs_rematerialization(v, 0.5 + 0.081, &config));
        assert!(needs_rematerialization(v, 0.5 - 0.081, &config));
    }

    #[test]
    fn test_cache_reuses_until_drift() {
        let config = BufferConfig::default();
        let mut cache = RenderCache::new();
        let v = view(10.0, 0.45);
        assert!(cache.update(v, 500, &config).is_rematerialize());
        assert_eq!(cache.generation(), 1);

        let panned = v.pan_by(0.5);
        match cache.update(panned, 500, &config) {
            RenderAction::Reuse { translation } => assert!((translation + 0.5).abs() < 1e-9),
            action => panic!("unexpected {action:?}"),
        }
        assert_eq!(cache.generation(), 1);

        assert!(cache.update(v.pan_by(0.9), 500, &config).is_rematerialize());
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn test_cache_rebuilds_on_zoom_or_count_change() {
        let config = BufferConfig::default();
        let mut cache = RenderCache::new();
        let v = view(10.0, 0.45);
        let _ = cache.update(v, 500, &config);
        assert!(cache.update(v, 501, &config).is_rematerialize());
        assert!(cache.update(view(11.0, 0.45), 501, &config).is_rematerialize());
        assert_eq!(cache.generation(), 3);

        cache.invalidate();
        assert_eq!(cache.rendered_center(), None);
        assert!(cache.update(v, 501, &config).is_rematerialize());
    }
}
