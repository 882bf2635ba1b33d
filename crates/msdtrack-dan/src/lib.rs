//! Dan (difficulty tier) classification and reference tuning.
//!
//! A measured [`SkillVector`] is matched against an ordered list of
//! [`DanReference`]s, easiest first. The reference table is configuration:
//! this crate ships none and reads whatever list it is given.
//!
//! # Modules
//!
//! - [`vector`]: skill vectors, the combined distance and references
//! - [`classify`]: nearest-reference matching, confidence and variant bands
//! - [`training`]: per-label aggregation of training samples
//!
//! # Tuning loop
//!
//! ```text
//! TrainingSet ── aggregate_for(references) ──▶ LabelAggregate
//!      ▲                                           │ to_reference()
//!      │                                           ▼
//!   samples  ◀── classify(vector) ◀──────── DanReference list
//! ```

pub use self::{
    classify::{
        BandThresholds, ClassificationResult, ClassifierConfig, ClassifyError, DanClassifier,
        VariantBand, classify,
    },
    training::{LabelAggregate, LabelSummary, TrainingSample, TrainingSet},
    vector::{DanReference, SkillVector},
};

pub mod classify;
pub mod training;
pub mod vector;
