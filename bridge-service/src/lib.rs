pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::AnalysisService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service_name: Arc<str>,
    pub analyzer: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(service_name: impl Into<Arc<str>>, analyzer: AnalysisService) -> Self {
        Self {
            service_name: service_name.into(),
            analyzer: Arc::new(analyzer),
        }
    }
}
