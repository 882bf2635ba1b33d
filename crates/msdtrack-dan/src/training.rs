//! Reducing labelled training samples to per-dan reference vectors
//!
//! Samples are skill vectors measured on plays that are known to belong to a
//! tier. Aggregating them per label gives the mean vector used to re-tune a
//! [`DanReference`], plus the spread of the auxiliary rating.
//!
//! A label without samples yields [`LabelAggregate::NoData`], never a zero
//! vector, so an empty group cannot drag a tuned reference towards zero.

use msdtrack_model::SkillsetScores;
use msdtrack_stats::descriptive::{DescriptiveStats, mean};
use serde::{Deserialize, Serialize};

use crate::vector::{DanReference, SkillVector};

/// A skill vector measured for a known tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub label: String,
    #[serde(flatten)]
    pub vector: SkillVector,
}

/// Aggregated statistics for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub count: usize,
    /// Component-wise mean of every sample
    pub mean: SkillVector,
    pub aux_min: f64,
    pub aux_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LabelAggregate {
    NoData { label: String },
    Summary(LabelSummary),
}

impl LabelAggregate {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::NoData { label } | Self::Summary(LabelSummary { label, .. }) => label,
        }
    }

    /// Number of samples; zero for [`LabelAggregate::NoData`].
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::NoData { .. } => 0,
            Self::Summary(summary) => summary.count,
        }
    }

    /// The mean vector as a reference, or `None` without data.
    ///
    /// Skillset scores are rounded to two decimals, matching calculator output.
    #[must_use]
    pub fn to_reference(&self) -> Option<DanReference> {
        match self {
            Self::NoData { .. } => None,
            Self::Summary(summary) => {
                let scores = summary.mean.scores.rounded();
                let vector = SkillVector::new(scores, summary.mean.aux_rating);
                Some(DanReference::new(summary.label.clone(), vector))
            }
        }
    }
}

/// A collection of training samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingSet {
    samples: Vec<TrainingSample>,
}

impl TrainingSet {
    #[must_use]
    pub fn new(samples: Vec<TrainingSample>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, sample: TrainingSample) {
        self.samples.push(sample);
    }

    /// Appends every sample of `other`.
    pub fn merge(&mut self, other: Self) {
        self.samples.extend(other.samples);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    /// Distinct labels in order of first appearance.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = vec![];
        for sample in &self.samples {
            if !labels.contains(&sample.label.as_str()) {
                labels.push(&sample.label);
            }
        }
        labels
    }

    /// Aggregates every sample labelled `label`.
    ///
    /// ```
    /// use msdtrack_dan::{SkillVector, TrainingSample, TrainingSet};
    ///
    /// let sample = |label: &str, v: f64| TrainingSample {
    ///     label: label.to_owned(),
    ///     vector: SkillVector::from_components([v; 9]),
    /// };
    /// let set = TrainingSet::new(vec![sample("3rd", 14.0), sample("3rd", 16.0), sample("4th", 18.0)]);
    ///
    /// let third = set.aggregate("3rd");
    /// assert_eq!(third.count(), 2);
    /// assert_eq!(third.to_reference().unwrap().vector.aux_rating, 15.0);
    /// assert!(set.aggregate("9th").is_no_data());
    /// ```
    #[must_use]
    pub fn aggregate(&self, label: &str) -> LabelAggregate {
        let vectors = self
            .samples
            .iter()
            .filter(|sample| sample.label == label)
            .map(|sample| sample.vector)
            .collect::<Vec<_>>();
        let Some(aux) = DescriptiveStats::new(vectors.iter().map(|v| v.aux_rating)) else {
            return LabelAggregate::NoData {
                label: label.to_owned(),
            };
        };

        let mut components = [0.0; 8];
        for (i, component) in components.iter_mut().enumerate() {
            *component = mean(vectors.iter().map(|v| v.scores.as_array()[i])).unwrap_or_default();
        }

        LabelAggregate::Summary(LabelSummary {
            label: label.to_owned(),
            count: aux.count,
            mean: SkillVector::new(SkillsetScores::from_array(components), aux.mean),
            aux_min: aux.min,
            aux_max: aux.max,
        })
    }

    /// One aggregate per reference, in reference order.
    #[must_use]
    pub fn aggregate_for(&self, references: &[DanReference]) -> Vec<LabelAggregate> {
        let aggregates = references
            .iter()
            .map(|reference| self.aggregate(&reference.label))
            .collect::<Vec<_>>();
        tracing::debug!(
            samples = self.samples.len(),
            labels = aggregates.len(),
            empty = aggregates.iter().filter(|a| a.is_no_data()).count(),
            "aggregated training samples"
        );
        aggregates
    }

    /// One aggregate per label present in the set.
    #[must_use]
    pub fn aggregate_all(&self) -> Vec<LabelAggregate> {
        self.labels()
            .into_iter()
            .map(|label| self.aggregate(label))
            .collect()
    }
}
