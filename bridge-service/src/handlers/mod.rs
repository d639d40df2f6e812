//! HTTP handlers for the bridge.

pub mod analyze;
pub mod health;

use service_core::error::AppError;

/// Fallback for methods a route does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
