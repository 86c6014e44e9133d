//! Environment-based service configuration.
//!
//! Each service reads its configuration from environment variables exactly
//! once at process start; the resulting structs are immutable for the
//! process lifetime. Missing required variables and unparseable values are
//! reported as [`ConfigError`] so binaries can fail fast.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

fn env_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn env_or(name: &str, default: &str) -> String {
    env_var(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env_var(name) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            var: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn env_required(name: &str) -> Result<String, ConfigError> {
    env_var(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Queue store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueBackend {
    /// Process-local in-memory store.
    Memory,
    /// Durable directory-per-queue store.
    File,
}

impl FromStr for QueueBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(QueueBackend::Memory),
            "file" => Ok(QueueBackend::File),
            _ => Err(()),
        }
    }
}

/// Queue store configuration shared by producer and worker.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Store backend.
    pub backend: QueueBackend,
    /// Base directory for the file backend.
    pub path: PathBuf,
    /// Queue name used for the task hand-off.
    pub task_queue: String,
}

impl QueueConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: env_parse("QUEUE_BACKEND", QueueBackend::File)?,
            path: PathBuf::from(env_or("QUEUE_PATH", "./queue-data")),
            task_queue: env_or("TASK_QUEUE", "tasks"),
        })
    }
}

/// Task producer service configuration.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub host: String,
    pub port: u16,
    pub queue: QueueConfig,
}

impl ProducerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("PRODUCER_HOST", "127.0.0.1"),
            port: env_parse("PRODUCER_PORT", 8080)?,
            queue: QueueConfig::from_env()?,
        })
    }
}

/// Completion notification routing for the worker.
///
/// The queue payload carries no delivery targets, so the worker takes them
/// from its own configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyTarget {
    /// Notifications disabled.
    None,
    /// Chat webhook only.
    Chat { webhook_url: String },
    /// Email only.
    Email { email_to: String },
    /// Both channels, attempted independently.
    Both {
        webhook_url: String,
        email_to: String,
    },
}

impl NotifyTarget {
    fn from_env() -> Result<Self, ConfigError> {
        match env_or("NOTIFY_TYPE", "none").as_str() {
            "none" => Ok(NotifyTarget::None),
            "chat" => Ok(NotifyTarget::Chat {
                webhook_url: env_required("NOTIFY_WEBHOOK_URL")?,
            }),
            "email" => Ok(NotifyTarget::Email {
                email_to: env_required("NOTIFY_EMAIL_TO")?,
            }),
            "both" => Ok(NotifyTarget::Both {
                webhook_url: env_required("NOTIFY_WEBHOOK_URL")?,
                email_to: env_required("NOTIFY_EMAIL_TO")?,
            }),
            other => Err(ConfigError::Invalid {
                var: "NOTIFY_TYPE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Worker process configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub queue: QueueConfig,
    /// Fixed backoff between polls of an empty queue.
    pub poll_interval: Duration,
    /// Upper bound on a single task execution.
    pub execution_timeout: Duration,
    /// Duration of the simulated placeholder work.
    pub simulated_work: Duration,
    /// Base URL of the notification dispatcher.
    pub notifier_url: String,
    /// Where completion events are routed.
    pub notify_target: NotifyTarget,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            queue: QueueConfig::from_env()?,
            poll_interval: Duration::from_secs(env_parse("POLL_INTERVAL_SECS", 5u64)?),
            execution_timeout: Duration::from_secs(env_parse("EXECUTION_TIMEOUT_SECS", 30u64)?),
            simulated_work: Duration::from_secs(env_parse("SIMULATED_WORK_SECS", 2u64)?),
            notifier_url: env_or("NOTIFIER_URL", "http://localhost:8083"),
            notify_target: NotifyTarget::from_env()?,
        })
    }
}

/// SMTP transport configuration for the email channel.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Sender address.
    pub from: String,
    /// Use STARTTLS; plain connection otherwise.
    pub starttls: bool,
}

impl SmtpConfig {
    /// Returns `None` when `SMTP_HOST` is unset; email delivery is then
    /// unavailable and reported per request as a delivery failure.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(host) = env_var("SMTP_HOST") else {
            return Ok(None);
        };
        Ok(Some(Self {
            host,
            port: env_parse("SMTP_PORT", 587)?,
            user: env_var("SMTP_USER"),
            password: env_var("SMTP_PASSWORD"),
            from: env_required("SMTP_FROM")?,
            starttls: env_parse("SMTP_STARTTLS", true)?,
        }))
    }
}

/// Notification dispatcher service configuration.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub host: String,
    pub port: u16,
    pub smtp: Option<SmtpConfig>,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("NOTIFIER_HOST", "127.0.0.1"),
            port: env_parse("NOTIFIER_PORT", 8083)?,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

/// Gateway service configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the producer the gateway forwards to.
    pub task_service_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or("GATEWAY_HOST", "127.0.0.1"),
            port: env_parse("GATEWAY_PORT", 9090)?,
            task_service_url: env_or("TASK_SERVICE_URL", "http://localhost:8080"),
        })
    }
}
