use serde::{Deserialize, Serialize};

/// A pattern-difficulty dimension reported by the MSD calculator.
///
/// The set is closed; labels that do not name one of the known skillsets map
/// to [`Skillset::Unknown`] instead of failing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Skillset {
    #[display("overall")]
    Overall,
    #[display("stream")]
    Stream,
    #[display("jumpstream")]
    Jumpstream,
    #[display("handstream")]
    Handstream,
    #[display("stamina")]
    Stamina,
    #[display("jackspeed")]
    Jackspeed,
    #[display("chordjack")]
    Chordjack,
    #[display("technical")]
    Technical,
    #[display("unknown")]
    Unknown,
}

impl Skillset {
    /// The eight calculator dimensions in canonical order.
    pub const SCORED: [Self; 8] = [
        Self::Overall,
        Self::Stream,
        Self::Jumpstream,
        Self::Handstream,
        Self::Stamina,
        Self::Jackspeed,
        Self::Chordjack,
        Self::Technical,
    ];

    /// Maps a free-form label onto a skillset.
    ///
    /// Matching ignores surrounding whitespace and ASCII case. Never fails.
    ///
    /// ```
    /// use msdtrack_model::Skillset;
    ///
    /// assert_eq!(Skillset::from_label(" JumpStream "), Skillset::Jumpstream);
    /// assert_eq!(Skillset::from_label(""), Skillset::Unknown);
    /// assert_eq!(Skillset::from_label("speedjack"), Skillset::Unknown);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::SCORED
            .into_iter()
            .find(|skillset| skillset.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Self::Unknown)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overall => "overall",
            Self::Stream => "stream",
            Self::Jumpstream => "jumpstream",
            Self::Handstream => "handstream",
            Self::Stamina => "stamina",
            Self::Jackspeed => "jackspeed",
            Self::Chordjack => "chordjack",
            Self::Technical => "technical",
            Self::Unknown => "unknown",
        }
    }
}

/// The eight skillset ratings returned by the MSD calculator for one chart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillsetScores {
    pub overall: f64,
    pub stream: f64,
    pub jumpstream: f64,
    pub handstream: f64,
    pub stamina: f64,
    pub jackspeed: f64,
    pub chordjack: f64,
    pub technical: f64,
}

impl SkillsetScores {
    /// Builds scores from an array in [`Skillset::SCORED`] order.
    #[must_use]
    pub const fn from_array(values: [f64; 8]) -> Self {
        let [
            overall,
            stream,
            jumpstream,
            handstream,
            stamina,
            jackspeed,
            chordjack,
            technical,
        ] = values;
        Self {
            overall,
            stream,
            jumpstream,
            handstream,
            stamina,
            jackspeed,
            chordjack,
            technical,
        }
    }

    /// Scores as an array in [`Skillset::SCORED`] order.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 8] {
        [
            self.overall,
            self.stream,
            self.jumpstream,
            self.handstream,
            self.stamina,
            self.jackspeed,
            self.chordjack,
            self.technical,
        ]
    }

    /// Score for a single skillset; `Unknown` has no score.
    #[must_use]
    pub fn get(&self, skillset: Skillset) -> Option<f64> {
        Skillset::SCORED
            .iter()
            .position(|s| *s == skillset)
            .map(|idx| self.as_array()[idx])
    }

    /// The highest-rated skillset other than `Overall`.
    ///
    /// The first skillset in canonical order wins ties.
    ///
    /// ```
    /// use msdtrack_model::{Skillset, SkillsetScores};
    ///
    /// let scores = SkillsetScores::from_array([25.0, 22.0, 24.5, 20.0, 21.0, 18.0, 19.0, 23.0]);
    /// assert_eq!(scores.dominant(), Skillset::Jumpstream);
    /// ```
    #[must_use]
    pub fn dominant(&self) -> Skillset {
        let values = self.as_array();
        let mut best = Skillset::Unknown;
        let mut best_value = f64::NEG_INFINITY;
        for (skillset, value) in Skillset::SCORED.into_iter().zip(values).skip(1) {
            if value > best_value {
                best = skillset;
                best_value = value;
            }
        }
        best
    }

    /// Every component rounded to two decimals.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::from_array(self.as_array().map(|v| (v * 100.0).round() / 100.0))
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}
