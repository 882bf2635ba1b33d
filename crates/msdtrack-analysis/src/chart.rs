//! Skill progression chart materialization
//!
//! [`SkillChart::materialize`] turns a [`PlayHistory`] and a view into the
//! viewport-space geometry a renderer draws: one scatter point per selected
//! play, an overall trend over every selected play and one trend per skillset.
//! Everything is tagged with its [`Skillset`] so the renderer can filter.
//!
//! [`SkillChart::render`] adds the buffering policy on top: geometry is only
//! rebuilt when [`RenderCache`] asks for it, otherwise the last build is
//! translated horizontally.

use std::collections::BTreeMap;

use msdtrack_model::{PlayHistory, Skillset};
use serde::{Deserialize, Serialize};

use crate::{
    buffer::{BufferConfig, BufferWindow, RenderAction, RenderCache, select_buffer_window},
    geometry::{ChartFrame, ValueRange},
    trend::{TrendConfig, TrendLines, compute_trend},
    viewport::{ViewState, ViewportConfig},
};

/// Every tunable used to draw the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub viewport: ViewportConfig,
    pub buffer: BufferConfig,
    pub trend: TrendConfig,
}

/// A scatter point for one play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    /// Index of the play in the history
    pub index: usize,
    pub skillset: Skillset,
}

/// Geometry for one materialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub window: Option<BufferWindow>,
    pub range: Option<ValueRange>,
    pub points: Vec<ChartPoint>,
    /// Trend over every selected play, tagged [`Skillset::Overall`]
    pub overall: Option<TrendLines>,
    /// Per-skillset trends, in skillset order; skillsets without any line are omitted
    pub skillsets: Vec<TrendLines>,
}

impl ChartGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shifts every point and segment horizontally by `dx`.
    #[must_use]
    pub fn translated(mut self, dx: f64) -> Self {
        for point in &mut self.points {
            point.x += dx;
        }
        self.overall = self.overall.map(|trend| trend.translated(dx));
        self.skillsets = self
            .skillsets
            .into_iter()
            .map(|trend| trend.translated(dx))
            .collect();
        self
    }

    /// Trend lines for `skillset`, if any were produced.
    #[must_use]
    pub fn trend(&self, skillset: Skillset) -> Option<&TrendLines> {
        if skillset == Skillset::Overall {
            return self.overall.as_ref();
        }
        self.skillsets.iter().find(|trend| trend.skillset == skillset)
    }
}

/// Chart state across redraws: configuration, render cache and the last build.
#[derive(Debug, Clone, Default)]
pub struct SkillChart {
    config: ChartConfig,
    cache: RenderCache,
    geometry: ChartGeometry,
}

impl SkillChart {
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            cache: RenderCache::new(),
            geometry: ChartGeometry::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Number of full rebuilds so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    /// Drops the cached geometry, e.g. after the history was replaced.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
        self.geometry = ChartGeometry::default();
    }

    /// Geometry to draw for `view`, rebuilding only when the cache requires it.
    pub fn render(&mut self, history: &PlayHistory, view: ViewState) -> ChartGeometry {
        match self.cache.update(view, history.len(), &self.config.buffer) {
            RenderAction::Empty => {
                self.geometry = ChartGeometry::default();
                ChartGeometry::default()
            }
            RenderAction::Reuse { translation } => self.geometry.clone().translated(translation),
            RenderAction::Rematerialize(window) => {
                self.geometry = materialize_window(history, view, window, &self.config);
                self.geometry.clone()
            }
        }
    }

    /// Builds chart geometry for `view` around `rendered_center`.
    ///
    /// The y axis spans the skill range of the whole history, so it does not
    /// jump while panning.
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use msdtrack_analysis::{
    ///     chart::{ChartConfig, SkillChart},
    ///     viewport::ViewState,
    /// };
    /// use msdtrack_model::{PlayHistory, PlayRecord, Skillset};
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
    /// let records = (0..30)
    ///     .map(|i| PlayRecord {
    ///         timestamp: start + Duration::minutes(i),
    ///         skill_value: 20.0 + i as f64 * 0.1,
    ///         skillset_label: if i % 2 == 0 { "stream" } else { "jackspeed" }.to_owned(),
    ///         accuracy: 95.0,
    ///         session_id: "s1".to_owned(),
    ///     })
    ///     .collect();
    /// let history = PlayHistory::new(records).unwrap();
    ///
    /// let view = ViewState::default();
    /// let chart = SkillChart::materialize(&history, view, view.center(), &ChartConfig::default());
    /// assert_eq!(chart.points.len(), 30);
    /// assert_eq!(chart.points[0].x, 0.0);
    /// assert_eq!(chart.points[29].y, 1.0);
    /// assert!(chart.trend(Skillset::Overall).is_some());
    /// assert!(chart.trend(Skillset::Stream).is_some());
    /// ```
    #[must_use]
    pub fn materialize(
        history: &PlayHistory,
        view: ViewState,
        rendered_center: f64,
        config: &ChartConfig,
    ) -> ChartGeometry {
        select_buffer_window(view, rendered_center, history.len(), &config.buffer)
            .map(|window| materialize_window(history, view, window, config))
            .unwrap_or_default()
    }
}

fn materialize_window(
    history: &PlayHistory,
    view: ViewState,
    window: BufferWindow,
    config: &ChartConfig,
) -> ChartGeometry {
    let Some((min, max)) = history.skill_range() else {
        return ChartGeometry::default();
    };
    let range = ValueRange::new(min, max);
    let frame = ChartFrame {
        count: history.len(),
        view,
        range,
    };

    let mut points = Vec::with_capacity(window.point_count());
    let mut overall = Vec::with_capacity(window.point_count());
    let mut by_skillset = BTreeMap::<Skillset, Vec<(usize, f64)>>::new();
    for index in window.indices() {
        let Some(record) = history.get(index) else {
            continue;
        };
        let skillset = record.skillset();
        let point = frame.project(index, record.skill_value);
        points.push(ChartPoint {
            x: point.x,
            y: point.y,
            index,
            skillset,
        });
        overall.push((index, record.skill_value));
        if !skillset.is_unknown() && !skillset.is_overall() {
            by_skillset
                .entry(skillset)
                .or_default()
                .push((index, record.skill_value));
        }
    }

    let overall = Some(compute_trend(Skillset::Overall, &overall, &frame, &config.trend))
        .filter(|trend| !trend.is_empty());
    let skillsets = by_skillset
        .iter()
        .map(|(&skillset, samples)| compute_trend(skillset, samples, &frame, &config.trend))
        .filter(|trend| !trend.is_empty())
        .collect::<Vec<_>>();

    tracing::debug!(
        start = window.start,
        end = window.end,
        stride = window.stride,
        points = points.len(),
        skillset_trends = skillsets.len(),
        "materialized chart"
    );

    ChartGeometry {
        window: Some(window),
        range: Some(range),
        points,
        overall,
        skillsets,
    }
}
