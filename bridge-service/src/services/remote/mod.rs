//! Remote inference backends.
//!
//! The bridge talks to exactly one backend, chosen at startup and shared
//! behind an `Arc<dyn InferenceBackend>`. Backends return the remote payload
//! untouched; shape normalization happens in [`crate::services::normalize`].

pub mod gradio;
pub mod mock;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub use gradio::{GradioBackend, MAX_ERROR_BODY_BYTES};
pub use mock::MockBackend;

/// MIME prefix attached to images sent upstream.
pub const IMAGE_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Error type for remote calls.
#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    #[error("Remote client not configured: {0}")]
    NotConfigured(String),

    #[error("Remote service timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Remote service returned status {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response from remote service: {0}")]
    InvalidResponse(String),
}

/// A service able to score an image.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Submit one image. Returns the raw JSON document the service answered with.
    async fn predict(&self, image: &[u8], enhance: bool) -> Result<Value, RemoteError>;

    /// Cheap reachability probe.
    async fn health_check(&self) -> Result<(), RemoteError>;
}

/// Encode raw image bytes as a PNG data URI.
pub fn encode_image(image: &[u8]) -> String {
    format!(
        "{}{}",
        IMAGE_DATA_URI_PREFIX,
        general_purpose::STANDARD.encode(image)
    )
}

/// Gradio positional payload: `{"data": [image, enhance]}`.
pub fn prediction_payload(image: &[u8], enhance: bool) -> Value {
    json!({ "data": [encode_image(image), enhance] })
}
