use std::path::Path;

use msdtrack_analysis::chart::ChartConfig;
use msdtrack_dan::ClassifierConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Every tunable the commands use. Missing keys fall back to defaults.
///
/// ```json
/// {
///   "chart": {
///     "viewport": { "max_zoom": 20.0 },
///     "buffer": { "max_visible_points": 300 },
///     "trend": { "moving_average_window": 10 }
///   },
///   "classifier": { "default_bands": { "edge_ratio": 0.4, "far_edge_ratio": 0.75 } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub chart: ChartConfig,
    pub classifier: ClassifierConfig,
}

impl AnalyticsConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config = util::read_json_file("config", path)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}
