use std::path::PathBuf;

use anyhow::Context as _;
use msdtrack_dan::{ClassificationResult, DanClassifier, SkillVector};
use msdtrack_model::Skillset;
use serde::Serialize;

use crate::{
    config::AnalyticsConfig,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClassifyArg {
    /// JSON array of dan references, easiest first
    dans: PathBuf,
    /// Eight skillset scores followed by the auxiliary rating, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    vector: Vec<f64>,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    display_label: String,
    /// Strongest non-overall skillset of the measured vector
    dominant_skillset: Skillset,
    dominant_score: Option<f64>,
    #[serde(flatten)]
    result: ClassificationResult,
}

impl ClassifyOutput {
    fn new(vector: &SkillVector, result: ClassificationResult) -> Self {
        let dominant_skillset = vector.scores.dominant();
        Self {
            display_label: result.display_label(),
            dominant_skillset,
            dominant_score: vector.scores.get(dominant_skillset),
            result,
        }
    }
}

pub(crate) fn run(arg: &ClassifyArg, config: &AnalyticsConfig) -> anyhow::Result<()> {
    let ClassifyArg {
        dans,
        vector,
        output,
    } = arg;

    let components: [f64; 9] = vector.as_slice().try_into().map_err(|_| {
        anyhow::anyhow!(
            "--vector needs 9 values (8 skillsets and the auxiliary rating), got {}",
            vector.len()
        )
    })?;
    let vector = SkillVector::from_components(components);

    let references = util::read_dans_file(dans)?;
    let classifier = DanClassifier::new(references, config.classifier.clone())
        .with_context(|| format!("Unusable dan table: {}", dans.display()))?;
    let result = classifier
        .classify(&vector)
        .context("Failed to classify skill vector")?;
    tracing::info!(
        label = %result.display_label(),
        confidence = result.confidence,
        "classified skill vector"
    );

    Output::save_json(&ClassifyOutput::new(&vector, result), output.as_deref())
}

#[cfg(test)]
mod tests {
    use msdtrack_dan::{ClassifierConfig, DanReference, classify};

    use super::*;

    #[test]
    fn test_output_carries_dominant_skillset() {
        let references = [
            DanReference::new("1st", SkillVector::from_components([10.0; 9])),
            DanReference::new("2nd", SkillVector::from_components([12.0; 9])),
        ];
        let vector =
            SkillVector::from_components([13.0, 11.0, 11.5, 10.0, 10.5, 12.5, 11.0, 10.0, 11.0]);
        let result = classify(&vector, &references, &ClassifierConfig::default()).unwrap();
        let output = ClassifyOutput::new(&vector, result);
        assert_eq!(output.dominant_skillset, Skillset::Jackspeed);
        assert_eq!(output.dominant_score, Some(12.5));
        assert_eq!(output.display_label, output.result.display_label());

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["dominant_skillset"], "jackspeed");
        assert_eq!(json["matched_label"], "2nd");
    }
}
