//! Nearest-reference dan classification with variant bands
//!
//! The measured [`SkillVector`] is compared against every [`DanReference`]
//! (ordered from easiest to hardest) with [`SkillVector::distance`]. The
//! closest reference wins; on equal distances the earlier one does.
//!
//! # Variant bands
//!
//! The match is then refined by looking at the two adjacent tiers. Let `d` be
//! the distance to the match and `n` the distance to the closer of its
//! neighbours. Because the match is the global minimum, `r = d / n` lies in
//! `[0, 1]`: 0 means the input sits on the reference itself, 1 means it is as
//! close to the neighbour as to the match.
//!
//! | ratio                                | band                 |
//! |--------------------------------------|----------------------|
//! | `r < edge_ratio`                     | [`VariantBand::Plain`] |
//! | `edge_ratio <= r < far_edge_ratio`   | `+` / `-`            |
//! | `far_edge_ratio <= r`                | `++` / `--`          |
//!
//! The sign points at the closer neighbour: `-` when the tier below is
//! closer, `+` when the tier above is. Equidistant neighbours give `Plain`.
//! Thresholds come from [`ClassifierConfig`] and can be overridden per tier.
//!
//! The lowest and highest tiers have a single real neighbour. The missing one
//! is replaced by that neighbour mirrored through the matched reference (see
//! [`SkillVector::mirrored`]), i.e. a virtual tier one spacing further out.
//! An input far below the lowest tier is therefore closer to the virtual tier
//! and gets `-`/`--`, and one far above the highest tier gets `+`/`++`. A
//! virtual tier is not a candidate match, so `r` may exceed 1 there; it still
//! falls in the double band.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::vector::{DanReference, SkillVector};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ClassifyError {
    #[display("no dan references to classify against")]
    EmptyReferences,
    #[display("measured skill vector contains non-finite values")]
    NonFiniteInput,
    #[display("dan reference {index} contains non-finite values")]
    NonFiniteReference { index: usize },
}

fn check_references(references: &[DanReference]) -> Result<(), ClassifyError> {
    if references.is_empty() {
        return Err(ClassifyError::EmptyReferences);
    }
    match references.iter().position(|r| !r.vector.is_finite()) {
        Some(index) => Err(ClassifyError::NonFiniteReference { index }),
        None => Ok(()),
    }
}

/// Ratio thresholds for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    /// Ratio from which a single `+`/`-` is given.
    pub edge_ratio: f64,
    /// Ratio from which a double `++`/`--` is given.
    pub far_edge_ratio: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            edge_ratio: 0.5,
            far_edge_ratio: 0.8,
        }
    }
}

impl BandThresholds {
    fn magnitude(&self, ratio: f64) -> u8 {
        if ratio >= self.far_edge_ratio {
            2
        } else if ratio >= self.edge_ratio {
            1
        } else {
            0
        }
    }
}

/// Variant banding policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub default_bands: BandThresholds,
    /// Per-tier overrides, keyed by reference label.
    pub tier_bands: BTreeMap<String, BandThresholds>,
}

impl ClassifierConfig {
    #[must_use]
    pub fn bands_for(&self, label: &str) -> BandThresholds {
        self.tier_bands
            .get(label)
            .copied()
            .unwrap_or(self.default_bands)
    }
}

/// Where the input sits relative to the matched tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum VariantBand {
    #[display("--")]
    MinusMinus,
    #[display("-")]
    Minus,
    #[display("")]
    Plain,
    #[display("+")]
    Plus,
    #[display("++")]
    PlusPlus,
}

impl VariantBand {
    fn from_parts(magnitude: u8, toward_higher: bool) -> Self {
        match (magnitude, toward_higher) {
            (0, _) => Self::Plain,
            (1, false) => Self::Minus,
            (1, true) => Self::Plus,
            (_, false) => Self::MinusMinus,
            (_, true) => Self::PlusPlus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub matched_label: String,
    pub variant_band: VariantBand,
    /// `1 / (1 + distance)`, in `(0, 1]`
    pub confidence: f64,
    pub distance: f64,
    /// Position of the match in the reference list
    pub matched_index: usize,
}

impl ClassificationResult {
    /// Label with the band suffix, e.g. `"7th+"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{}{}", self.matched_label, self.variant_band)
    }
}

/// Monotonically decreasing map from distance to `(0, 1]`.
#[must_use]
pub fn confidence(distance: f64) -> f64 {
    1.0 / (1.0 + distance.max(0.0))
}

/// Classifies `vector` against `references`.
///
/// ```
/// use msdtrack_dan::{ClassifierConfig, DanReference, SkillVector, VariantBand, classify};
///
/// let tier = |label: &str, v: f64| DanReference::new(label, SkillVector::from_components([v; 9]));
/// let references = [tier("1st", 10.0), tier("2nd", 12.0), tier("3rd", 14.0)];
///
/// let exact = classify(&references[1].vector, &references, &ClassifierConfig::default()).unwrap();
/// assert_eq!(exact.matched_index, 1);
/// assert_eq!(exact.distance, 0.0);
/// assert_eq!(exact.confidence, 1.0);
/// assert_eq!(exact.variant_band, VariantBand::Plain);
///
/// let high = classify(&SkillVector::from_components([12.9; 9]), &references, &ClassifierConfig::default())
///     .unwrap();
/// assert_eq!(high.display_label(), "2nd++");
/// ```
pub fn classify(
    vector: &SkillVector,
    references: &[DanReference],
    config: &ClassifierConfig,
) -> Result<ClassificationResult, ClassifyError> {
    check_references(references)?;
    if !vector.is_finite() {
        return Err(ClassifyError::NonFiniteInput);
    }

    let distances = references
        .iter()
        .map(|reference| vector.distance(&reference.vector))
        .collect::<Vec<_>>();
    let mut matched_index = 0;
    for (index, &distance) in distances.iter().enumerate().skip(1) {
        if distance < distances[matched_index] {
            matched_index = index;
        }
    }
    let distance = distances[matched_index];
    let matched = &references[matched_index];

    let below = matched_index.checked_sub(1).map(|i| distances[i]);
    let above = distances.get(matched_index + 1).copied();
    // Edge tiers: mirror the lone neighbour through the match
    let virtual_distance = |neighbour: usize| {
        vector.distance(&references[neighbour].vector.mirrored(&matched.vector))
    };
    let (below, above) = match (below, above) {
        (None, Some(_)) => (Some(virtual_distance(matched_index + 1)), above),
        (Some(_), None) => (below, Some(virtual_distance(matched_index - 1))),
        sides => sides,
    };
    let variant_band = band(distance, below, above, config.bands_for(&matched.label));

    let result = ClassificationResult {
        matched_label: matched.label.clone(),
        variant_band,
        confidence: confidence(distance),
        distance,
        matched_index,
    };
    tracing::debug!(
        label = %result.display_label(),
        distance = result.distance,
        confidence = result.confidence,
        "classified skill vector"
    );
    Ok(result)
}

fn band(
    distance: f64,
    below: Option<f64>,
    above: Option<f64>,
    bands: BandThresholds,
) -> VariantBand {
    let (neighbour, toward_higher) = match (below, above) {
        (None, None) => return VariantBand::Plain,
        (Some(lo), None) => (lo, false),
        (None, Some(hi)) => (hi, true),
        (Some(lo), Some(hi)) if lo < hi => (lo, false),
        (Some(lo), Some(hi)) if hi < lo => (hi, true),
        (Some(_), Some(_)) => return VariantBand::Plain,
    };
    if neighbour <= 0.0 {
        return VariantBand::Plain;
    }
    VariantBand::from_parts(bands.magnitude(distance / neighbour), toward_higher)
}

/// Classifier bound to a fixed reference list and policy.
#[derive(Debug, Clone)]
pub struct DanClassifier {
    references: Vec<DanReference>,
    config: ClassifierConfig,
}

impl DanClassifier {
    pub fn new(
        references: Vec<DanReference>,
        config: ClassifierConfig,
    ) -> Result<Self, ClassifyError> {
        check_references(&references)?;
        Ok(Self { references, config })
    }

    #[must_use]
    pub fn references(&self) -> &[DanReference] {
        &self.references
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, vector: &SkillVector) -> Result<ClassificationResult, ClassifyError> {
        classify(vector, &self.references, &self.config)
    }
}
