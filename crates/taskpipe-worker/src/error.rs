//! Worker errors.

use thiserror::Error;

/// Worker error types.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Task execution failed.
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),

    /// Completion notification could not be delivered.
    #[error("Notification delivery failed: {0}")]
    NotificationFailed(String),
}
