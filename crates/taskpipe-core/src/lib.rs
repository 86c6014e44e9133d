//! # Taskpipe Core
//!
//! Shared building blocks for the taskpipe pipeline services.
//!
//! ## Contents
//!
//! - Task data model with its status lifecycle
//! - Environment-based configuration for every service, loaded once at
//!   process start and immutable afterwards

pub mod config;
pub mod error;
pub mod task;

pub use config::{
    GatewayConfig, NotifierConfig, NotifyTarget, ProducerConfig, QueueBackend, QueueConfig,
    SmtpConfig, WorkerConfig,
};
pub use error::ConfigError;
pub use task::{Task, TaskStatus};
