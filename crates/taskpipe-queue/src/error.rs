//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Malformed queue name; a caller bug, never retried.
    #[error("Invalid queue name: {0:?}")]
    InvalidQueueName(String),

    /// Store unreachable or failing; retryable by the caller.
    #[error("Queue store unavailable: {0}")]
    Unavailable(String),
}

impl QueueError {
    /// Whether the caller may retry the operation after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QueueError::Unavailable(_))
    }
}
