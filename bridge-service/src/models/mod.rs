pub mod analysis;
pub mod health;

pub use analysis::{Analysis, AnalysisRequest, AnalysisResult, Scores};
pub use health::HealthResponse;
