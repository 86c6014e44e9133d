//! Dispatcher error types and their HTTP rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Dispatcher error types.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Unknown type, unparseable body, or missing channel target.
    #[error("Invalid notification request: {0}")]
    InvalidInput(String),

    /// The requested channel could not deliver the event.
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = match &self {
            NotifyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            NotifyError::DeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
