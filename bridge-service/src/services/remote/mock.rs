//! Mock backend for testing.

use super::{prediction_payload, InferenceBackend, RemoteError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Respond(Value),
    Fail(RemoteError),
}

/// Mock backend that records the payload it would have sent upstream.
pub struct MockBackend {
    behavior: MockBehavior,
    payloads: Mutex<Vec<Value>>,
}

impl MockBackend {
    pub fn responding(value: Value) -> Self {
        Self::new(MockBehavior::Respond(value))
    }

    pub fn failing(error: RemoteError) -> Self {
        Self::new(MockBehavior::Fail(error))
    }

    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Outbound payloads seen so far, oldest first.
    pub fn payloads(&self) -> Vec<Value> {
        self.payloads
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn predict(&self, image: &[u8], enhance: bool) -> Result<Value, RemoteError> {
        if let Ok(mut payloads) = self.payloads.lock() {
            payloads.push(prediction_payload(image, enhance));
        }

        match &self.behavior {
            MockBehavior::Respond(value) => Ok(value.clone()),
            MockBehavior::Fail(err) => Err(err.clone()),
        }
    }

    async fn health_check(&self) -> Result<(), RemoteError> {
        match &self.behavior {
            MockBehavior::Respond(_) => Ok(()),
            MockBehavior::Fail(err) => Err(err.clone()),
        }
    }
}
