//! Data model shared by the msdtrack crates.
//!
//! - [`Skillset`] / [`SkillsetScores`]: the closed set of MSD dimensions and one
//!   chart's eight ratings
//! - [`PlayRecord`] / [`PlayHistory`]: validated, timestamp-ordered plays, the
//!   index space used by every chart computation
//! - [`Session`]: plays grouped by session id

pub use self::{
    play::{PlayDataError, PlayHistory, PlayRecord, RecordField, Session, group_sessions},
    skillset::{Skillset, SkillsetScores},
};

pub mod play;
pub mod skillset;
