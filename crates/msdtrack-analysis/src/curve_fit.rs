//! Fitting a [`SkillCurveModel`] to historical sessions
//!
//! Every qualifying session is stretched onto the `0..=100` timeline, the
//! pooled plays are split into five equal-width time segments and each
//! segment becomes one control point:
//!
//! | segment        | control point time |
//! |----------------|--------------------|
//! | `[0, 20)`      | 0                  |
//! | `[20, 40)`     | 25                 |
//! | `[40, 60)`     | 50                 |
//! | `[60, 80)`     | 75                 |
//! | `[80, 100]`    | 100                |
//!
//! The control point offset is the segment's mean skill value relative to the
//! base value, its label the segment's most frequent known skillset.

use std::num::NonZeroU32;

use msdtrack_model::{PlayHistory, Session, Skillset};
use msdtrack_stats::{binning::FixedBins, descriptive::mean};

use crate::curve::{ControlPoint, CurveError, DEFAULT_DURATION_MINUTES, SkillCurveModel};

/// Sessions with fewer plays are ignored.
pub const MIN_SESSION_PLAYS: usize = 3;

/// Sessions shorter than this are ignored.
pub const MIN_SESSION_MINUTES: f64 = 5.0;

/// A fit needs at least this many plays from qualifying sessions.
pub const MIN_SAMPLES: usize = 10;

/// Control point time for each segment.
pub const SEGMENT_TIMES: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Fitted session durations are clamped to this range, in minutes.
pub const DURATION_RANGE_MINUTES: (u32, u32) = (30, 180);

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CurveFitError {
    #[display("{samples} usable plays, at least {required} required")]
    InsufficientData { samples: usize, required: usize },
    #[display("base value {base} cannot anchor percentage offsets")]
    DegenerateBase { base: f64 },
    #[display("fitted curve is invalid: {_0}")]
    InvalidCurve(CurveError),
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    percent: f64,
    skill_value: f64,
    skillset: Skillset,
}

fn qualifies(session: &Session<'_>) -> Option<f64> {
    let minutes = session.duration_minutes()?;
    (session.plays.len() >= MIN_SESSION_PLAYS && minutes >= MIN_SESSION_MINUTES).then_some(minutes)
}

#[expect(clippy::cast_precision_loss)]
fn normalize<'a>(session: &'a Session<'a>, minutes: f64) -> impl Iterator<Item = Sample> + 'a {
    let start = session.plays[0].timestamp;
    session.plays.iter().map(move |play| {
        let elapsed = (play.timestamp - start).num_milliseconds() as f64 / 60_000.0;
        Sample {
            percent: (100.0 * elapsed / minutes).clamp(0.0, 100.0),
            skill_value: play.skill_value,
            skillset: play.skillset(),
        }
    })
}

/// Most frequent known skillset; the first one seen wins ties.
fn dominant_label(samples: &[Sample]) -> Option<Skillset> {
    let mut counts: Vec<(Skillset, usize)> = vec![];
    for sample in samples.iter().filter(|s| !s.skillset.is_unknown()) {
        match counts.iter_mut().find(|(skillset, _)| *skillset == sample.skillset) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.skillset, 1)),
        }
    }
    let mut best: Option<(Skillset, usize)> = None;
    for (skillset, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((skillset, count));
        }
    }
    best.map(|(skillset, _)| skillset)
}

/// Mean of `durations` in whole minutes, clamped to [`DURATION_RANGE_MINUTES`];
/// [`DEFAULT_DURATION_MINUTES`] when there are none.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn typical_session_minutes<I>(durations: I) -> NonZeroU32
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = DURATION_RANGE_MINUTES;
    mean(durations)
        .filter(|m| m.is_finite())
        .map(|m| m.round().clamp(f64::from(lo), f64::from(hi)) as u32)
        .and_then(NonZeroU32::new)
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

/// Fits a five-point curve to the sessions in `history`.
///
/// `overall_rating`, when given, is used as the base value instead of the
/// mean skill value of the usable plays.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use msdtrack_analysis::curve_fit::fit_curve_from_history;
/// use msdtrack_model::{PlayHistory, PlayRecord};
///
/// let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
/// let records = (0..12)
///     .map(|i| PlayRecord {
///         timestamp: start + Duration::minutes(i * 6),
///         skill_value: 20.0,
///         skillset_label: "stream".to_owned(),
///         accuracy: 95.0,
///         session_id: "evening".to_owned(),
///     })
///     .collect();
/// let history = PlayHistory::new(records).unwrap();
///
/// let curve = fit_curve_from_history(&history, None).unwrap();
/// assert_eq!(curve.points().len(), 5);
/// assert_eq!(curve.base_value(), 20.0);
/// assert_eq!(curve.total_duration_minutes(), 66);
/// assert!(curve.points().iter().all(|p| p.offset_percent == 0.0));
/// ```
pub fn fit_curve_from_history(
    history: &PlayHistory,
    overall_rating: Option<f64>,
) -> Result<SkillCurveModel, CurveFitError> {
    let mut samples = vec![];
    let mut durations = vec![];
    for session in history.sessions() {
        let Some(minutes) = qualifies(&session) else {
            tracing::debug!(
                session = session.id,
                start = ?session.start(),
                plays = session.plays.len(),
                minutes = ?session.duration_minutes(),
                "skipping session too short for curve fitting"
            );
            continue;
        };
        durations.push(minutes);
        samples.extend(normalize(&session, minutes));
    }

    if samples.len() < MIN_SAMPLES {
        return Err(CurveFitError::InsufficientData {
            samples: samples.len(),
            required: MIN_SAMPLES,
        });
    }

    let base = match overall_rating {
        Some(rating) => rating,
        None => mean(samples.iter().map(|s| s.skill_value)).unwrap_or(0.0),
    };
    if !base.is_finite() || base.abs() < f64::EPSILON {
        return Err(CurveFitError::DegenerateBase { base });
    }

    let mut bins = FixedBins::new(0.0, 100.0, &SEGMENT_TIMES);
    for sample in &samples {
        bins.push(sample.percent, *sample);
    }
    let points = bins
        .into_bins()
        .into_iter()
        .map(|bin| match mean(bin.items.iter().map(|s| s.skill_value)) {
            Some(average) => ControlPoint {
                time_percent: bin.representative,
                offset_percent: 100.0 * (average - base) / base,
                label: dominant_label(&bin.items),
            },
            None => ControlPoint::new(bin.representative, 0.0),
        })
        .collect::<Vec<_>>();

    let minutes = typical_session_minutes(durations.iter().copied());
    tracing::debug!(
        sessions = durations.len(),
        samples = samples.len(),
        base,
        minutes = minutes.get(),
        "fitted skill curve"
    );
    SkillCurveModel::new(points, base, minutes.get()).map_err(CurveFitError::InvalidCurve)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use msdtrack_model::PlayRecord;

    use super::*;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn play(minute: i64, session: &str, skill_value: f64, label: &str) -> PlayRecord {
        PlayRecord {
            timestamp: at(minute),
            skill_value,
            skillset_label: label.to_owned(),
            accuracy: 95.0,
            session_id: session.to_owned(),
        }
    }

    /// One 100 minute session, a play every 10 minutes.
    fn ramp_session() -> Vec<PlayRecord> {
        let rows = [
            (0, 18.0, "stream"),
            (10, 18.0, "stream"),
            (20, 20.0, "jackspeed"),
            (30, 20.0, "stream"),
            (40, 22.0, ""),
            (50, 22.0, "unknown"),
            (60, 20.0, "chordjack"),
            (70, 20.0, "technical"),
            (80, 20.0, "stamina"),
            (90, 20.0, "stamina"),
            (100, 20.0, "stream"),
        ];
        rows.iter()
            .map(|&(minute, value, label)| play(minute, "a", value, label))
            .collect()
    }

    #[test]
    fn test_fit_segments() {
        let history = PlayHistory::new(ramp_session()).unwrap();
        let curve = fit_curve_from_history(&history, None).unwrap();
        assert_eq!(curve.base_value(), 20.0);
        assert_eq!(curve.total_duration_minutes(), 100);

        let points = curve.points();
        let times = points.iter().map(|p| p.time_percent).collect::<Vec<_>>();
        assert_eq!(times, SEGMENT_TIMES);
        let offsets = points.iter().map(|p| p.offset_percent).collect::<Vec<_>>();
        assert_eq!(offsets, [-10.0, 0.0, 10.0, 0.0, 0.0]);

        let labels = points.iter().map(|p| p.label).collect::<Vec<_>>();
        assert_eq!(
            labels,
            [
                Some(Skillset::Stream),
                Some(Skillset::Jackspeed),
                None,
                Some(Skillset::Chordjack),
                Some(Skillset::Stamina),
            ]
        );
    }

    #[test]
    fn test_overall_rating_overrides_base() {
        let history = PlayHistory::new(ramp_session()).unwrap();
        let curve = fit_curve_from_history(&history, Some(25.0)).unwrap();
        assert_eq!(curve.base_value(), 25.0);
        assert_eq!(curve.points()[2].offset_percent, 100.0 * (22.0 - 25.0) / 25.0);
    }

    #[test]
    fn test_degenerate_base() {
        let history = PlayHistory::new(ramp_session()).unwrap();
        assert_eq!(
            fit_curve_from_history(&history, Some(0.0)),
            Err(CurveFitError::DegenerateBase { base: 0.0 })
        );
    }

    #[test]
    fn test_short_sessions_are_discarded() {
        let mut records = vec![play(0, "pair", 20.0, "stream"), play(20, "pair", 20.0, "stream")];
        records.extend((0..10).map(|i| play(30 + i / 3, "burst", 20.0, "stream")));
        let history = PlayHistory::new(records).unwrap();
        assert_eq!(
            fit_curve_from_history(&history, None),
            Err(CurveFitError::InsufficientData {
                samples: 0,
                required: MIN_SAMPLES
            })
        );
    }

    #[test]
    fn test_nine_samples_are_not_enough() {
        let records = (0..9).map(|i| play(i * 5, "a", 20.0, "stream")).collect();
        let history = PlayHistory::new(records).unwrap();
        let err = fit_curve_from_history(&history, None).unwrap_err();
        assert_eq!(
            err,
            CurveFitError::InsufficientData {
                samples: 9,
                required: 10
            }
        );
    }

    #[test]
    fn test_empty_segments_are_neutral() {
        // Plays during the first 9 minutes and one at minute 30: nothing lands in 40..80%
        let mut records = (0..10)
            .map(|i| play(i, "a", 21.0, "jumpstream"))
            .collect::<Vec<_>>();
        records.push(play(30, "a", 21.0, "jumpstream"));
        let history = PlayHistory::new(records).unwrap();
        let curve = fit_curve_from_history(&history, None).unwrap();
        for point in &curve.points()[2..4] {
            assert_eq!(point.offset_percent, 0.0);
            assert_eq!(point.label, None);
        }
        assert_eq!(curve.points()[4].label, Some(Skillset::Jumpstream));
        assert_eq!(curve.total_duration_minutes(), 30);
    }

    #[test]
    fn test_sessions_are_pooled() {
        let mut records = ramp_session();
        records.extend((0..6).map(|i| play(200 + i * 60, "b", 20.0, "stream")));
        let history = PlayHistory::new(records).unwrap();
        let curve = fit_curve_from_history(&history, None).unwrap();
        // (100 + 300) / 2 minutes
        assert_eq!(curve.total_duration_minutes(), 180);
        assert_eq!(curve.points().len(), 5);
    }

    #[test]
    fn test_typical_session_minutes() {
        assert_eq!(typical_session_minutes([]), DEFAULT_DURATION_MINUTES);
        assert_eq!(typical_session_minutes([10.0]).get(), 30);
        assert_eq!(typical_session_minutes([400.0]).get(), 180);
        assert_eq!(typical_session_minutes([60.0, 75.0]).get(), 68);
    }

    #[test]
    fn test_dominant_label_ties_keep_first() {
        let sample = |skillset| Sample {
            percent: 0.0,
            skill_value: 0.0,
            skillset,
        };
        let samples = [
            sample(Skillset::Unknown),
            sample(Skillset::Unknown),
            sample(Skillset::Handstream),
            sample(Skillset::Stream),
            sample(Skillset::Stream),
            sample(Skillset::Handstream),
        ];
        assert_eq!(dominant_label(&samples), Some(Skillset::Handstream));
        assert_eq!(dominant_label(&samples[..2]), None);
    }
}
