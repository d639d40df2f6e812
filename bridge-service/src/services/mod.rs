pub mod analyzer;
pub mod fallback;
pub mod normalize;
pub mod remote;

pub use analyzer::{AnalysisOutcome, AnalysisService};
