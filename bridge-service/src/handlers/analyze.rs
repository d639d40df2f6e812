use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::error::Category;
use service_core::error::AppError;

use crate::models::AnalysisRequest;
use crate::AppState;

/// `POST /analyze`.
pub async fn analyze_image(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Image payload too large".to_string())
        } else {
            AppError::bad_request(rejection.body_text())
        }
    })?;

    let request = parse_request(&body)?;

    let outcome = state.analyzer.analyze(request).await?;
    tracing::info!(ml_source = outcome.ml_source(), "Analysis completed");

    Ok(outcome.into_response())
}

/// Parse the request body.
///
/// Empty bodies and well-formed documents of the wrong shape are rejected
/// with 400. Bytes that are not JSON at all are reported as 500.
pub fn parse_request(body: &[u8]) -> Result<AnalysisRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::bad_request("No image provided"));
    }

    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Data => AppError::bad_request(format!("Invalid request body: {}", e)),
        Category::Syntax | Category::Eof | Category::Io => {
            AppError::InternalError(anyhow::anyhow!("Malformed JSON in request body: {}", e))
        }
    })
}
