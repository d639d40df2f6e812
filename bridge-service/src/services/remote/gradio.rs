//! Gradio inference backend.
//!
//! Posts the image to a hosted Gradio app's prediction route and returns the
//! JSON document it answers with.

use super::{prediction_payload, InferenceBackend, RemoteError};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Upper bound on how much of an error response body is kept.
pub const MAX_ERROR_BODY_BYTES: usize = 512;

/// HTTP client for a single Gradio prediction endpoint.
#[derive(Clone)]
pub struct GradioBackend {
    client: Client,
    endpoint: Url,
    health_url: Url,
    timeout: Duration,
    health_timeout: Duration,
}

impl GradioBackend {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            RemoteError::NotConfigured(format!("invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        // The app root answers cheaply and needs no payload.
        let mut health_url = endpoint.clone();
        health_url.set_path("/");
        health_url.set_query(None);

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            health_url,
            timeout: config.timeout,
            health_timeout: config.health_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn map_send_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else {
            RemoteError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for GradioBackend {
    async fn predict(&self, image: &[u8], enhance: bool) -> Result<Value, RemoteError> {
        let payload = prediction_payload(image, enhance);
        let started = Instant::now();

        tracing::debug!(
            endpoint = %self.endpoint,
            image_bytes = image.len(),
            enhance,
            "Sending prediction request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            tracing::warn!(
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                body = %body,
                "Remote service returned an error status"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| RemoteError::InvalidResponse(format!("not JSON: {}", e)))?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction received"
        );

        Ok(value)
    }

    async fn health_check(&self) -> Result<(), RemoteError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::Timeout(self.health_timeout)
                } else {
                    RemoteError::Connection(e.to_string())
                }
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RemoteError::Status {
                status: response.status().as_u16(),
                body: String::new(),
            })
        }
    }
}

/// Read at most `MAX_ERROR_BODY_BYTES` of a failed response.
async fn read_error_body(mut response: Response) -> String {
    let mut body = Vec::new();
    while body.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_ERROR_BODY_BYTES - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            Ok(None) | Err(_) => break,
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
