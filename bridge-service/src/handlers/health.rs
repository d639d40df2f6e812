use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// `GET /health`. Never touches the remote service.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(&*state.service_name))
}

/// `GET /analyze`. Also reports whether the remote service is reachable.
pub async fn analyze_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.analyzer.remote_connected().await;
    Json(HealthResponse::healthy(&*state.service_name).with_remote(connected))
}
