use serde::{Deserialize, Serialize};

use super::{lenient, Photo};

/// Input for a photo progress check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisRequest {
    pub image: Photo,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub project_phase: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub quality_assessment: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub concerns: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub recommendations: Vec<String>,
    /// Percentage complete, 0 to 100.
    #[serde(default, deserialize_with = "progress")]
    pub estimated_progress: f64,
}

fn progress<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient::number(deserializer)?
        .map(|p| p.clamp(0.0, 100.0))
        .unwrap_or(0.0))
}
