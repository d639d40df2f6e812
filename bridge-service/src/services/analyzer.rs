//! Request validation and remote delegation for `POST /analyze`.

use crate::config::FailurePolicy;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::services::fallback::fallback_result;
use crate::services::normalize::normalize_response;
use crate::services::remote::{InferenceBackend, RemoteError};
use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde_json::Value;
use service_core::error::AppError;
use std::sync::Arc;

/// Response header telling callers where the scores came from.
pub const ML_SOURCE_HEADER: &str = "x-ml-source";

/// Standard alphabet, tolerant of non-canonical trailing bits and padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Result of a successful analysis call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Normalized payload from the remote service.
    Remote(Value),
    /// Synthetic scores produced because the remote call failed.
    Fallback(AnalysisResult),
}

impl AnalysisOutcome {
    pub fn ml_source(&self) -> &str {
        match self {
            AnalysisOutcome::Remote(_) => "remote",
            AnalysisOutcome::Fallback(result) => &result.ml_source,
        }
    }
}

impl IntoResponse for AnalysisOutcome {
    fn into_response(self) -> Response {
        let source = HeaderValue::from_str(self.ml_source())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

        let mut response = match self {
            AnalysisOutcome::Remote(result) => Json(result).into_response(),
            AnalysisOutcome::Fallback(result) => Json(result).into_response(),
        };
        response.headers_mut().insert(ML_SOURCE_HEADER, source);
        response
    }
}

/// Validates requests, calls the inference backend and applies the
/// configured failure policy.
#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn InferenceBackend>,
    policy: FailurePolicy,
}

impl AnalysisService {
    pub fn new(backend: Arc<dyn InferenceBackend>, policy: FailurePolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AppError> {
        let encoded = request
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::bad_request("No image provided"))?;

        let image = decode_image(encoded)?;
        let enhance = request.enhance();

        tracing::info!(image_bytes = image.len(), enhance, "Analyzing image");

        match self.backend.predict(&image, enhance).await {
            Ok(response) => Ok(AnalysisOutcome::Remote(normalize_response(response))),
            Err(err) => self.on_remote_failure(err),
        }
    }

    /// Whether the remote service currently answers its reachability probe.
    pub async fn remote_connected(&self) -> bool {
        match self.backend.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Remote service health probe failed");
                false
            }
        }
    }

    fn on_remote_failure(&self, err: RemoteError) -> Result<AnalysisOutcome, AppError> {
        match self.policy {
            FailurePolicy::Strict => {
                tracing::error!(error = ?err, "Remote analysis failed");
                // Remote errors can carry the upstream URL; callers get a fixed message.
                let message = match err {
                    RemoteError::Timeout(_) => "Remote analysis service timed out",
                    _ => "Remote analysis service unavailable",
                };
                Err(AppError::ServiceUnavailable(message.to_string()))
            }
            FailurePolicy::Fallback => {
                tracing::warn!(error = ?err, "Remote analysis failed, returning fallback scores");
                Ok(AnalysisOutcome::Fallback(fallback_result(
                    &mut rand::thread_rng(),
                )))
            }
        }
    }
}

/// Remove a leading `data:image...;base64,` prefix.
pub fn strip_data_uri(encoded: &str) -> Result<&str, AppError> {
    if !encoded.starts_with("data:image") {
        return Ok(encoded);
    }

    encoded
        .split_once(',')
        .map(|(_, data)| data)
        .ok_or_else(|| AppError::bad_request("Malformed data URI: missing ',' separator"))
}

/// Decode a (possibly data-URI prefixed) base64 image into raw bytes.
///
/// Line breaks and other ASCII whitespace are ignored, so wrapped output of
/// `base64`/`openssl base64` is accepted.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    let data: String = strip_data_uri(encoded)?
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = LENIENT_BASE64
        .decode(&data)
        .map_err(|e| AppError::bad_request(format!("Invalid base64 image data: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::bad_request("Decoded image is empty"));
    }

    Ok(bytes)
}
