//! Test helpers for bridge-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use bridge_service::config::{
    BridgeConfig, FailurePolicy, HttpConfig, ObservabilityConfig, RemoteConfig,
};
use bridge_service::services::remote::InferenceBackend;
use bridge_service::services::AnalysisService;
use bridge_service::startup::{build_router, Application};
use bridge_service::AppState;
use service_core::config::Config;
use std::sync::Arc;
use std::time::Duration;

/// Base64 of a tiny JPEG header (`FF D8 FF E0`).
pub const SAMPLE_IMAGE_B64: &str = "/9j/4A==";

pub fn test_config(policy: FailurePolicy) -> BridgeConfig {
    BridgeConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        service_name: "bridge".to_string(),
        remote: RemoteConfig {
            endpoint: "http://127.0.0.1:9/api/predict".to_string(),
            timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(1),
        },
        policy,
        http: HttpConfig {
            max_body_bytes: 64 * 1024,
            allowed_origins: vec!["*".to_string()],
        },
        observability: ObservabilityConfig {
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
    }
}

/// Router wired to the given backend, for `oneshot` tests.
pub fn router(backend: Arc<dyn InferenceBackend>, policy: FailurePolicy) -> Router {
    let config = test_config(policy);
    let state = AppState::new(
        config.service_name.as_str(),
        AnalysisService::new(backend, policy),
    );
    build_router(state, &config.http)
}

/// Spawn the application on a random port and return its base URL.
pub async fn spawn_app(backend: Arc<dyn InferenceBackend>, policy: FailurePolicy) -> String {
    let app = Application::build_with_backend(test_config(policy), backend)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    format!("http://127.0.0.1:{}", port)
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON")
}
