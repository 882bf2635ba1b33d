//! Skill vectors and dan references
//!
//! A [`SkillVector`] is the nine-dimensional point the classifier works in:
//! the eight calculator skillsets plus one auxiliary rating. References and
//! training samples serialize flat:
//!
//! ```json
//! {
//!   "label": "5th",
//!   "scores": { "overall": 21.4, "stream": 20.9, ... },
//!   "aux_rating": 6.8
//! }
//! ```

use msdtrack_model::SkillsetScores;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillVector {
    pub scores: SkillsetScores,
    /// Auxiliary rating compared alongside the skillsets
    pub aux_rating: f64,
}

impl SkillVector {
    #[must_use]
    pub const fn new(scores: SkillsetScores, aux_rating: f64) -> Self {
        Self { scores, aux_rating }
    }

    /// Builds a vector from eight skillset scores followed by the auxiliary rating.
    #[must_use]
    pub const fn from_components(components: [f64; 9]) -> Self {
        let [a, b, c, d, e, f, g, h, aux_rating] = components;
        Self {
            scores: SkillsetScores::from_array([a, b, c, d, e, f, g, h]),
            aux_rating,
        }
    }

    #[must_use]
    pub fn components(&self) -> [f64; 9] {
        let [a, b, c, d, e, f, g, h] = self.scores.as_array();
        [a, b, c, d, e, f, g, h, self.aux_rating]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.scores.is_finite() && self.aux_rating.is_finite()
    }

    /// Euclidean distance over the eight skillsets.
    #[must_use]
    pub fn skillset_distance(&self, other: &Self) -> f64 {
        self.scores
            .as_array()
            .into_iter()
            .zip(other.scores.as_array())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Reflection of `self` through `pivot`, i.e. `2 * pivot - self` per component.
    ///
    /// ```
    /// use msdtrack_dan::SkillVector;
    ///
    /// let lower = SkillVector::from_components([10.0; 9]);
    /// let pivot = SkillVector::from_components([12.0; 9]);
    /// assert_eq!(lower.mirrored(&pivot), SkillVector::from_components([14.0; 9]));
    /// ```
    #[must_use]
    pub fn mirrored(&self, pivot: &Self) -> Self {
        let own = self.components();
        let mut components = pivot.components();
        for (c, v) in components.iter_mut().zip(own) {
            *c = 2.0 * *c - v;
        }
        Self::from_components(components)
    }

    /// Skillset distance and auxiliary delta combined in quadrature.
    ///
    /// ```
    /// use msdtrack_dan::SkillVector;
    ///
    /// let a = SkillVector::from_components([0.0; 9]);
    /// let b = SkillVector::from_components([3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
    /// assert_eq!(a.skillset_distance(&b), 3.0);
    /// assert_eq!(a.distance(&b), 5.0);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        self.skillset_distance(other).hypot(self.aux_rating - other.aux_rating)
    }
}

/// A named tier and its reference vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DanReference {
    pub label: String,
    #[serde(flatten)]
    pub vector: SkillVector,
}

impl DanReference {
    #[must_use]
    pub fn new(label: impl Into<String>, vector: SkillVector) -> Self {
        Self {
            label: label.into(),
            vector,
        }
    }
}
