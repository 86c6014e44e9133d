//! Sleep abstraction for the poll loop.
//!
//! The loop never calls `tokio::time::sleep` directly; tests inject a clock
//! double to observe backoff behavior without real delays.

use std::time::Duration;

use async_trait::async_trait;

/// Clock used for the poll-interval backoff.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Sleep for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed clock used in production.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
