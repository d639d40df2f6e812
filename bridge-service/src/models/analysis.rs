use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    /// Base64 image, optionally prefixed with `data:image/...;base64,`.
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the remote service should enhance the image first.
    #[serde(default)]
    pub enhance: Option<bool>,
}

impl AnalysisRequest {
    pub fn enhance(&self) -> bool {
        self.enhance.unwrap_or(true)
    }
}

/// Uniform analysis payload returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub status: String,
    pub scores: Scores,
    pub analysis: Analysis,
    pub ml_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scores {
    pub aesthetic_score: f64,
    pub blur_score: f64,
    pub composition_score: f64,
    pub combined_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub blur_category: String,
    pub face_detected: bool,
    pub aesthetic_rating: String,
    pub recommendation: String,
    pub action: String,
}
