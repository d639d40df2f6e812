use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    /// Only reported by `GET /analyze`, which probes the remote service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_connected: Option<bool>,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            service: service.into(),
            version: env!("CARGO_PKG_VERSION"),
            remote_connected: None,
        }
    }

    pub fn with_remote(mut self, connected: bool) -> Self {
        self.remote_connected = Some(connected);
        self
    }
}
