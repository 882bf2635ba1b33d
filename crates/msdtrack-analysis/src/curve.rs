//! Piecewise-linear skill curve over a session timeline
//!
//! A [`SkillCurveModel`] describes how a player's expected skill value moves
//! through a session. The x axis is the session timeline in percent
//! (`0..=100`), the y axis an offset in percent relative to a base value:
//!
//! ```text
//! value(t) = base_value * (1 + offset(t) / 100)
//! ```
//!
//! `offset(t)` interpolates linearly between [`ControlPoint`]s. Before the
//! first and after the last point the curve is flat.
//!
//! Invariants kept by every mutation:
//!
//! - points are sorted by `time_percent`, each clamped to `[0, 100]`
//! - no two points are closer than [`MIN_POINT_SEPARATION`]
//! - there are always at least [`MIN_POINTS`] points
//! - the session duration is positive

use std::num::NonZeroU32;

use msdtrack_model::Skillset;
use serde::{Deserialize, Serialize};

/// Minimum distance, in timeline percent, between two control points.
pub const MIN_POINT_SEPARATION: f64 = 0.5;

/// A curve never holds fewer points than this.
pub const MIN_POINTS: usize = 2;

/// Session length used when nothing better is known.
pub const DEFAULT_DURATION_MINUTES: NonZeroU32 = NonZeroU32::new(80).unwrap();

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CurveError {
    #[display("a curve needs at least {min} control points, got {count}")]
    TooFewPoints { count: usize, min: usize },
    #[display("control point at {time_percent}% is too close to the point at {existing}%")]
    PointTooClose { time_percent: f64, existing: f64 },
    #[display("control point index {index} is out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },
    #[display("session duration must be positive")]
    InvalidDuration,
    #[display("curve values must be finite")]
    NonFiniteValue,
}

/// An anchor of the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Position on the session timeline, `0..=100`
    pub time_percent: f64,
    /// Offset from the base value in percent; may be negative
    pub offset_percent: f64,
    #[serde(default)]
    pub label: Option<Skillset>,
}

impl ControlPoint {
    #[must_use]
    pub const fn new(time_percent: f64, offset_percent: f64) -> Self {
        Self {
            time_percent,
            offset_percent,
            label: None,
        }
    }

    #[must_use]
    pub const fn with_label(mut self, label: Skillset) -> Self {
        self.label = Some(label);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCurveModel {
    points: Vec<ControlPoint>,
    base_value: f64,
    total_duration_minutes: NonZeroU32,
}

fn clamp_percent(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 100.0) }
}

impl SkillCurveModel {
    /// Builds a curve from unordered points.
    ///
    /// Times are clamped to `[0, 100]` and the points sorted.
    pub fn new(
        mut points: Vec<ControlPoint>,
        base_value: f64,
        total_duration_minutes: u32,
    ) -> Result<Self, CurveError> {
        let total_duration_minutes =
            NonZeroU32::new(total_duration_minutes).ok_or(CurveError::InvalidDuration)?;
        if !base_value.is_finite() {
            return Err(CurveError::NonFiniteValue);
        }
        if points.len() < MIN_POINTS {
            return Err(CurveError::TooFewPoints {
                count: points.len(),
                min: MIN_POINTS,
            });
        }

        for point in &mut points {
            if !point.time_percent.is_finite() || !point.offset_percent.is_finite() {
                return Err(CurveError::NonFiniteValue);
            }
            point.time_percent = clamp_percent(point.time_percent);
        }
        points.sort_by(|a, b| a.time_percent.total_cmp(&b.time_percent));
        if let Some(pair) = points
            .windows(2)
            .find(|pair| pair[1].time_percent - pair[0].time_percent < MIN_POINT_SEPARATION)
        {
            return Err(CurveError::PointTooClose {
                time_percent: pair[1].time_percent,
                existing: pair[0].time_percent,
            });
        }

        Ok(Self {
            points,
            base_value,
            total_duration_minutes,
        })
    }

    /// The canonical warmup, ramp and cooldown shape:
    /// `(0, -10)`, `(18.75, -10)`, `(75, +15)`, `(100, 0)`.
    ///
    /// Fails with [`CurveError::NonFiniteValue`] for a non-finite base.
    pub fn default_shape(
        base_value: f64,
        total_duration_minutes: NonZeroU32,
    ) -> Result<Self, CurveError> {
        if !base_value.is_finite() {
            return Err(CurveError::NonFiniteValue);
        }
        Ok(Self {
            points: vec![
                ControlPoint::new(0.0, -10.0),
                ControlPoint::new(18.75, -10.0),
                ControlPoint::new(75.0, 15.0),
                ControlPoint::new(100.0, 0.0),
            ],
            base_value,
            total_duration_minutes,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[must_use]
    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    pub fn set_base_value(&mut self, base_value: f64) -> Result<(), CurveError> {
        if !base_value.is_finite() {
            return Err(CurveError::NonFiniteValue);
        }
        self.base_value = base_value;
        Ok(())
    }

    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes.get()
    }

    pub fn set_total_duration_minutes(&mut self, minutes: u32) -> Result<(), CurveError> {
        self.total_duration_minutes = NonZeroU32::new(minutes).ok_or(CurveError::InvalidDuration)?;
        Ok(())
    }

    /// Interpolated offset in percent at `time_percent` (clamped to `[0, 100]`).
    #[must_use]
    pub fn percent_at(&self, time_percent: f64) -> f64 {
        let t = clamp_percent(time_percent);
        let split = self.points.partition_point(|p| p.time_percent <= t);
        let before = split.checked_sub(1).map(|i| &self.points[i]);
        let after = self.points.get(split);
        match (before, after) {
            (Some(before), Some(after)) => {
                let span = after.time_percent - before.time_percent;
                let ratio = (t - before.time_percent) / span;
                before.offset_percent + ratio * (after.offset_percent - before.offset_percent)
            }
            (Some(only), None) | (None, Some(only)) => only.offset_percent,
            (None, None) => 0.0,
        }
    }

    /// Skill value at `time_percent`.
    ///
    /// ```
    /// use msdtrack_analysis::curve::{DEFAULT_DURATION_MINUTES, SkillCurveModel};
    ///
    /// let curve = SkillCurveModel::default_shape(20.0, DEFAULT_DURATION_MINUTES).unwrap();
    /// assert_eq!(curve.value_at(0.0), 18.0);
    /// assert!((curve.value_at(75.0) - 23.0).abs() < 1e-12);
    /// assert!((curve.value_at(50.0) - 20.78).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn value_at(&self, time_percent: f64) -> f64 {
        self.base_value * (1.0 + self.percent_at(time_percent) / 100.0)
    }

    /// Skill value `minutes` into the session.
    #[must_use]
    pub fn value_at_minutes(&self, minutes: f64) -> f64 {
        self.value_at(self.percent_from_minutes(minutes))
    }

    /// Label of the most recent labelled point at or before `time_percent`.
    #[must_use]
    pub fn label_at(&self, time_percent: f64) -> Option<Skillset> {
        let t = clamp_percent(time_percent);
        let split = self.points.partition_point(|p| p.time_percent <= t);
        self.points[..split].iter().rev().find_map(|p| p.label)
    }

    #[must_use]
    pub fn minutes_from_percent(&self, percent: f64) -> f64 {
        f64::from(self.total_duration_minutes.get()) * percent / 100.0
    }

    #[must_use]
    pub fn percent_from_minutes(&self, minutes: f64) -> f64 {
        100.0 * minutes / f64::from(self.total_duration_minutes.get())
    }

    /// Index of the point closest to `time_percent`, if within `tolerance`.
    #[must_use]
    pub fn nearest_point(&self, time_percent: f64, tolerance: f64) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, (p.time_percent - time_percent).abs()))
            .filter(|&(_, distance)| distance <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// `steps + 1` evenly spaced `(time_percent, value)` pairs from 0 to 100.
    #[must_use]
    pub fn sample(&self, steps: u32) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| {
                let t = 100.0 * f64::from(i) / f64::from(steps);
                (t, self.value_at(t))
            })
            .collect()
    }

    fn check_separation(&self, t: f64, skip: Option<usize>) -> Result<(), CurveError> {
        match self
            .points
            .iter()
            .enumerate()
            .filter(|&(i, _)| Some(i) != skip)
            .find(|(_, p)| (p.time_percent - t).abs() < MIN_POINT_SEPARATION)
        {
            Some((_, p)) => Err(CurveError::PointTooClose {
                time_percent: t,
                existing: p.time_percent,
            }),
            None => Ok(()),
        }
    }

    fn insert_sorted(&mut self, point: ControlPoint) -> usize {
        let index = self
            .points
            .partition_point(|p| p.time_percent <= point.time_percent);
        self.points.insert(index, point);
        index
    }

    /// Inserts a point and returns its index.
    ///
    /// ```
    /// use msdtrack_analysis::curve::{CurveError, DEFAULT_DURATION_MINUTES, SkillCurveModel};
    ///
    /// let mut curve = SkillCurveModel::default_shape(20.0, DEFAULT_DURATION_MINUTES).unwrap();
    /// assert_eq!(curve.insert_point(50.0, 5.0, None), Ok(2));
    /// assert!(matches!(
    ///     curve.insert_point(50.3, 0.0, None),
    ///     Err(CurveError::PointTooClose { .. })
    /// ));
    /// assert_eq!(curve.points().len(), 5);
    /// ```
    pub fn insert_point(
        &mut self,
        time_percent: f64,
        offset_percent: f64,
        label: Option<Skillset>,
    ) -> Result<usize, CurveError> {
        if !time_percent.is_finite() || !offset_percent.is_finite() {
            return Err(CurveError::NonFiniteValue);
        }
        let t = clamp_percent(time_percent);
        self.check_separation(t, None)?;
        Ok(self.insert_sorted(ControlPoint {
            time_percent: t,
            offset_percent,
            label,
        }))
    }

    /// Removes the point at `index`. Fails, leaving the curve untouched, if
    /// that would leave fewer than [`MIN_POINTS`] points.
    pub fn remove_point(&mut self, index: usize) -> Result<ControlPoint, CurveError> {
        let len = self.points.len();
        if index >= len {
            return Err(CurveError::IndexOutOfRange { index, len });
        }
        if len <= MIN_POINTS {
            return Err(CurveError::TooFewPoints {
                count: len - 1,
                min: MIN_POINTS,
            });
        }
        Ok(self.points.remove(index))
    }

    /// Moves the point at `index` and returns its new index. The label is kept.
    pub fn update_point(
        &mut self,
        index: usize,
        time_percent: f64,
        offset_percent: f64,
    ) -> Result<usize, CurveError> {
        let len = self.points.len();
        if index >= len {
            return Err(CurveError::IndexOutOfRange { index, len });
        }
        if !time_percent.is_finite() || !offset_percent.is_finite() {
            return Err(CurveError::NonFiniteValue);
        }
        let t = clamp_percent(time_percent);
        self.check_separation(t, Some(index))?;
        let mut point = self.points.remove(index);
        point.time_percent = t;
        point.offset_percent = offset_percent;
        Ok(self.insert_sorted(point))
    }

    pub fn set_label(&mut self, index: usize, label: Option<Skillset>) -> Result<(), CurveError> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(CurveError::IndexOutOfRange { index, len })?;
        point.label = label;
        Ok(())
    }
}
