//! Task execution.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use taskpipe_core::Task;

use crate::error::WorkerError;

/// Executes the domain-specific work of a task.
///
/// Execution must complete or fail within a bounded time; the worker
/// enforces the bound with a timeout so the loop never blocks indefinitely.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute a task.
    async fn execute(&self, task: &Task) -> Result<(), WorkerError>;
}

/// Fixed-duration placeholder standing in for real domain work.
pub struct SimulatedExecutor {
    work: Duration,
}

impl SimulatedExecutor {
    /// Create an executor that sleeps for `work` per task.
    pub fn new(work: Duration) -> Self {
        Self { work }
    }
}

#[async_trait]
impl TaskExecutor for SimulatedExecutor {
    async fn execute(&self, task: &Task) -> Result<(), WorkerError> {
        debug!(task_id = %task.id, title = %task.title, "Simulating task work");
        tokio::time::sleep(self.work).await;
        Ok(())
    }
}
