//! Producer error types and their HTTP rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use taskpipe_queue::QueueError;

/// Producer error types.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Request body did not parse into the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidInput(String),

    /// Task could not be serialized for the queue.
    #[error("Failed to serialize task: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Enqueue failed; the task is not created.
    #[error("Queue store unavailable: {0}")]
    QueueUnavailable(#[from] QueueError),
}

impl IntoResponse for ProducerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProducerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ProducerError::Serialization(_) | ProducerError::QueueUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
