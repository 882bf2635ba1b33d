//! Viewport-space primitives handed to the renderer
//!
//! x may lie outside `[0, 1]` (off-screen plays); y is always clamped into
//! `[0, 1]` through a [`ValueRange`]. Zero-length segments are never emitted.

use serde::{Deserialize, Serialize};

use crate::viewport::{ViewState, index_to_viewport_x};

/// Segments shorter than this are treated as degenerate and skipped.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translated(self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let length = self.length();
        length.is_nan() || length < MIN_SEGMENT_LENGTH
    }

    #[must_use]
    pub fn translated(self, dx: f64) -> Self {
        Self {
            start: self.start.translated(dx),
            end: self.end.translated(dx),
        }
    }
}

/// Maps skill values onto the clamped y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Normalized y of `value`, clamped to `[0, 1]`.
    ///
    /// A range narrower than [`MIN_SEGMENT_LENGTH`] maps everything to 0.5.
    ///
    /// ```
    /// use msdtrack_analysis::geometry::ValueRange;
    ///
    /// let range = ValueRange::new(10.0, 30.0);
    /// assert_eq!(range.normalize(15.0), 0.25);
    /// assert_eq!(range.normalize(45.0), 1.0);
    /// assert_eq!(ValueRange::new(20.0, 20.0).normalize(5.0), 0.5);
    /// ```
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width.is_nan() || width.abs() < MIN_SEGMENT_LENGTH {
            return 0.5;
        }
        let y = (value - self.min) / width;
        if y.is_nan() { 0.5 } else { y.clamp(0.0, 1.0) }
    }
}

/// Everything needed to project `(play index, skill value)` into viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    /// Number of plays in the full history
    pub count: usize,
    pub view: ViewState,
    pub range: ValueRange,
}

impl ChartFrame {
    #[must_use]
    pub fn project(&self, index: usize, value: f64) -> Point {
        Point::new(
            index_to_viewport_x(index, self.count, self.view),
            self.range.normalize(value),
        )
    }
}

/// Upper bound on the dashes [`dash_segment`] emits for one segment.
pub const MAX_DASHES: usize = 4096;

/// Dash and gap lengths, in normalized viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashPattern {
    pub dash: f64,
    pub gap: f64,
}

impl Default for DashPattern {
    fn default() -> Self {
        Self {
            dash: 0.02,
            gap: 0.01,
        }
    }
}

/// Connects consecutive points, skipping zero-length links.
#[must_use]
pub fn polyline(points: &[Point]) -> Vec<Segment> {
    points
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .filter(|segment| !segment.is_degenerate())
        .collect()
}

/// Splits `segment` into dashes by walking along its direction vector.
///
/// Dashes start at `segment.start`; each is `pattern.dash` long (the last one
/// is cut at the segment end) and followed by a `pattern.gap` gap. A pattern
/// with a non-positive dash yields the segment unchanged. Dashes shorter than
/// `length / MAX_DASHES` are widened to that length, so at most
/// [`MAX_DASHES`] dashes are produced.
///
/// ```
/// use msdtrack_analysis::geometry::{DashPattern, Point, Segment, dash_segment};
///
/// let line = Segment::new(Point::new(0.0, 0.5), Point::new(0.1, 0.5));
/// let dashes = dash_segment(line, DashPattern::default());
/// assert_eq!(dashes.len(), 4);
/// assert_eq!(dashes[0].end.x, 0.02);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn dash_segment(segment: Segment, pattern: DashPattern) -> Vec<Segment> {
    let length = segment.length();
    if length.is_nan() || length < MIN_SEGMENT_LENGTH {
        return vec![];
    }
    if !pattern.dash.is_finite() || pattern.dash <= 0.0 {
        return vec![segment];
    }
    let dash = pattern.dash.max(length / MAX_DASHES as f64);
    let gap = if pattern.gap.is_finite() {
        pattern.gap.max(0.0)
    } else {
        0.0
    };
    let period = dash + gap;
    let count = ((length / period).ceil() as usize).min(MAX_DASHES);

    let dir_x = (segment.end.x - segment.start.x) / length;
    let dir_y = (segment.end.y - segment.start.y) / length;
    let at = |t: f64| Point::new(segment.start.x + dir_x * t, segment.start.y + dir_y * t);

    (0..count)
        .map(|i| i as f64 * period)
        .take_while(|&t| t < length)
        .map(|t| Segment::new(at(t), at((t + dash).min(length))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_skips_degenerate_links() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.5),
        ];
        let segments = polyline(&points);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, Point::new(0.5, 0.5));
        assert!(polyline(&points[..1]).is_empty());
    }

    #[test]
    fn test_dash_walk_is_deterministic() {
        let line = Segment::new(Point::new(0.0, 0.0), Point::new(0.3, 0.4));
        let dashes = dash_segment(line, DashPattern::default());
        // length 0.5, period 0.03 => ceil(0.5 / 0.03) dashes
        assert_eq!(dashes.len(), 17);
        assert_eq!(dashes, dash_segment(line, DashPattern::default()));
        let last = dashes.last().unwrap();
        assert!((last.end.x - 0.3).abs() < 1e-12);
        assert!((last.end.y - 0.4).abs() < 1e-12);
        for dash in &dashes {
            assert!(dash.length() <= 0.02 + 1e-12);
        }
    }

    #[test]
    fn test_dash_degenerate_segment() {
        let point = Point::new(0.2, 0.2);
        assert!(dash_segment(Segment::new(point, point), DashPattern::default()).is_empty());
    }

    #[test]
    fn test_dash_without_pattern_is_solid() {
        let line = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let pattern = DashPattern { dash: 0.0, gap: 0.5 };
        assert_eq!(dash_segment(line, pattern), [line]);
    }

    #[test]
    fn test_tiny_dash_is_bounded() {
        let line = Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let pattern = DashPattern {
            dash: 1e-7,
            gap: 0.0,
        };
        let dashes = dash_segment(line, pattern);
        assert!(dashes.len() <= MAX_DASHES);
        assert!(dashes.len() >= MAX_DASHES - 1);
        assert_eq!(dashes[0].start, line.start);
        assert!((dashes.last().unwrap().end.x - 1.0).abs() < 1e-9);

        let pattern = DashPattern {
            dash: f64::MIN_POSITIVE,
            gap: 0.0,
        };
        assert!(dash_segment(line, pattern).len() <= MAX_DASHES);
    }

    #[test]
    fn test_translation() {
        let segment = Segment::new(Point::new(0.1, 0.2), Point::new(0.3, 0.4)).translated(-0.5);
        assert!((segment.start.x + 0.4).abs() < 1e-12);
        assert_eq!(segment.end.y, 0.4);
    }
}
