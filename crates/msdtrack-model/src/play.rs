//! Play records and the validated, timestamp-ordered play history
//!
//! The index of a play inside a [`PlayHistory`] is the coordinate every
//! geometry computation works in, so a history can only be built from records
//! that are already ordered by timestamp and carry finite numbers.
//!
//! # Serialization
//!
//! Records use `serde` with RFC 3339 timestamps:
//!
//! ```json
//! {
//!   "timestamp": "2024-05-01T19:30:00Z",
//!   "skill_value": 24.31,
//!   "skillset": "jumpstream",
//!   "accuracy": 96.2,
//!   "session_id": "2024-05-01#1"
//! }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Skillset;

/// A single scored play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub timestamp: DateTime<Utc>,
    /// Highest MSD of the play
    pub skill_value: f64,
    /// Raw skillset label as stored by the loader
    #[serde(rename = "skillset")]
    pub skillset_label: String,
    /// Accuracy in percent (0-100)
    pub accuracy: f64,
    pub session_id: String,
}

impl PlayRecord {
    /// The skillset named by [`PlayRecord::skillset_label`].
    #[must_use]
    pub fn skillset(&self) -> Skillset {
        Skillset::from_label(&self.skillset_label)
    }
}

/// Which numeric field of a record failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RecordField {
    #[display("skill_value")]
    SkillValue,
    #[display("accuracy")]
    Accuracy,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum PlayDataError {
    #[display("play #{index} has a non-finite {field}")]
    NonFiniteValue { index: usize, field: RecordField },
    #[display("play #{index} is older than the play before it")]
    Unsorted { index: usize },
}

/// An immutable, validated sequence of plays ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayHistory {
    records: Vec<PlayRecord>,
}

impl PlayHistory {
    /// Validates and wraps `records`.
    ///
    /// Records must already be sorted by timestamp (ties allowed) and every
    /// skill value and accuracy must be finite. Nothing is reordered or
    /// repaired.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use msdtrack_model::{PlayDataError, PlayHistory, PlayRecord};
    ///
    /// let play = |minute, skill_value| PlayRecord {
    ///     timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 20, minute, 0).unwrap(),
    ///     skill_value,
    ///     skillset_label: "stream".to_owned(),
    ///     accuracy: 95.0,
    ///     session_id: "a".to_owned(),
    /// };
    ///
    /// let history = PlayHistory::new(vec![play(0, 20.0), play(5, 21.0)]).unwrap();
    /// assert_eq!(history.len(), 2);
    ///
    /// let err = PlayHistory::new(vec![play(5, 20.0), play(0, 21.0)]).unwrap_err();
    /// assert_eq!(err, PlayDataError::Unsorted { index: 1 });
    /// ```
    pub fn new(records: Vec<PlayRecord>) -> Result<Self, PlayDataError> {
        for (index, record) in records.iter().enumerate() {
            if !record.skill_value.is_finite() {
                return Err(PlayDataError::NonFiniteValue {
                    index,
                    field: RecordField::SkillValue,
                });
            }
            if !record.accuracy.is_finite() {
                return Err(PlayDataError::NonFiniteValue {
                    index,
                    field: RecordField::Accuracy,
                });
            }
        }
        if let Some(index) = records
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(PlayDataError::Unsorted { index: index + 1 });
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[PlayRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlayRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayRecord> + '_ {
        self.records.iter()
    }

    /// Skill values in index order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.skill_value)
    }

    /// Smallest and largest skill value, or `None` for an empty history.
    #[must_use]
    pub fn skill_range(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Groups plays by session, preserving the order in which sessions first appear.
    #[must_use]
    pub fn sessions(&self) -> Vec<Session<'_>> {
        group_sessions(&self.records)
    }
}

impl<'a> IntoIterator for &'a PlayHistory {
    type Item = &'a PlayRecord;
    type IntoIter = std::slice::Iter<'a, PlayRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// The plays belonging to one session, in timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<'a> {
    pub id: &'a str,
    pub plays: Vec<&'a PlayRecord>,
}

impl Session<'_> {
    /// Time between the first and last play in minutes, or `None` for an empty session.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn duration_minutes(&self) -> Option<f64> {
        let first = self.plays.first()?;
        let last = self.plays.last()?;
        let millis = (last.timestamp - first.timestamp).num_milliseconds();
        Some(millis as f64 / 60_000.0)
    }

    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.plays.first().map(|p| p.timestamp)
    }
}

/// Groups `records` by session id.
///
/// Sessions are returned in order of first appearance; plays keep their input
/// order within a session.
#[must_use]
pub fn group_sessions(records: &[PlayRecord]) -> Vec<Session<'_>> {
    let mut index_by_id = HashMap::new();
    let mut sessions: Vec<Session<'_>> = vec![];
    for record in records {
        let idx = *index_by_id
            .entry(record.session_id.as_str())
            .or_insert_with(|| {
                sessions.push(Session {
                    id: record.session_id.as_str(),
                    plays: vec![],
                });
                sessions.len() - 1
            });
        sessions[idx].plays.push(record);
    }
    sessions
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn play(minute: i64, session: &str, skill_value: f64) -> PlayRecord {
        PlayRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
                + Duration::minutes(minute),
            skill_value,
            skillset_label: "Stream".to_owned(),
            accuracy: 93.5,
            session_id: session.to_owned(),
        }
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = PlayHistory::new(vec![play(0, "a", 20.0), play(1, "a", f64::NAN)]).unwrap_err();
        assert_eq!(
            err,
            PlayDataError::NonFiniteValue {
                index: 1,
                field: RecordField::SkillValue
            }
        );

        let mut bad = play(2, "a", 20.0);
        bad.accuracy = f64::INFINITY;
        let err = PlayHistory::new(vec![bad]).unwrap_err();
        assert_eq!(err.to_string(), "play #0 has a non-finite accuracy");
    }

    #[test]
    fn test_equal_timestamps_are_sorted() {
        let history = PlayHistory::new(vec![play(0, "a", 20.0), play(0, "a", 21.0)]);
        assert!(history.is_ok());
    }

    #[test]
    fn test_skill_range() {
        assert_eq!(PlayHistory::default().skill_range(), None);
        let history = PlayHistory::new(vec![
            play(0, "a", 20.0),
            play(1, "a", 18.5),
            play(2, "a", 26.0),
        ])
        .unwrap();
        assert_eq!(history.skill_range(), Some((18.5, 26.0)));
    }

    #[test]
    fn test_skillset_from_record() {
        assert_eq!(play(0, "a", 20.0).skillset(), Skillset::Stream);
    }

    #[test]
    fn test_group_sessions_preserves_first_appearance() {
        let history = PlayHistory::new(vec![
            play(0, "b", 20.0),
            play(1, "a", 21.0),
            play(2, "b", 22.0),
            play(30, "a", 23.0),
        ])
        .unwrap();
        let sessions = history.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "b");
        assert_eq!(sessions[0].plays.len(), 2);
        assert_eq!(sessions[1].id, "a");
        assert_eq!(sessions[1].duration_minutes(), Some(29.0));
    }

    #[test]
    fn test_deserialize_record() {
        let json = r#"{
            "timestamp": "2024-05-01T19:30:00Z",
            "skill_value": 24.31,
            "skillset": "jumpstream",
            "accuracy": 96.2,
            "session_id": "s1"
        }"#;
        let record: PlayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.skillset(), Skillset::Jumpstream);
        assert_eq!(record.skill_value, 24.31);
    }
}
