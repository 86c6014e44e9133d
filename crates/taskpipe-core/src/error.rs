//! Configuration errors.

use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Required environment variable not set: {0}")]
    Missing(String),

    /// An environment variable holds an unparseable value.
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: String, value: String },
}
