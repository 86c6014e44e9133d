//! The poll/execute/notify loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{error, info, warn};

use taskpipe_core::{Task, TaskStatus, WorkerConfig};
use taskpipe_queue::{QueueStore, dead_letter_queue};

use crate::clock::Clock;
use crate::executor::TaskExecutor;
use crate::notifier::CompletionNotifier;

/// Outcome of one `POLL` iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    /// Queue empty; the loop backs off for the poll interval.
    Empty,
    /// Store unreachable; same backoff, retried indefinitely.
    StoreUnavailable,
    /// Undeserializable payload parked on the dead-letter queue.
    DeadLettered,
    /// An item was executed to the given terminal status.
    Processed(TaskStatus),
}

/// A single sequential worker loop.
///
/// Run several worker processes for parallelism; the store's atomic dequeue
/// is the only coordination point between them.
pub struct Worker {
    config: WorkerConfig,
    store: Arc<dyn QueueStore>,
    executor: Arc<dyn TaskExecutor>,
    notifier: Arc<dyn CompletionNotifier>,
    clock: Arc<dyn Clock>,
    poisoned: AtomicU64,
}

impl Worker {
    /// Create a worker over injected collaborators.
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn QueueStore>,
        executor: Arc<dyn TaskExecutor>,
        notifier: Arc<dyn CompletionNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            executor,
            notifier,
            clock,
            poisoned: AtomicU64::new(0),
        }
    }

    /// Number of poison payloads parked on the dead-letter queue so far.
    pub fn poisoned(&self) -> u64 {
        self.poisoned.load(Ordering::SeqCst)
    }

    /// One `POLL -> (EMPTY | ITEM)` iteration.
    ///
    /// Never sleeps; the caller decides how to pace iterations from the
    /// returned [`Iteration`].
    pub async fn run_once(&self) -> Iteration {
        let queue = &self.config.queue.task_queue;

        let payload = match self.store.dequeue(queue).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return Iteration::Empty,
            Err(e) => {
                error!(error = %e, queue = %queue, "Failed to poll queue");
                return Iteration::StoreUnavailable;
            }
        };

        let mut task: Task = match serde_json::from_slice(&payload) {
            Ok(task) => task,
            Err(e) => {
                warn!(error = %e, queue = %queue, "Undeserializable payload, parking on dead-letter queue");
                self.dead_letter(&payload).await;
                self.poisoned.fetch_add(1, Ordering::SeqCst);
                return Iteration::DeadLettered;
            }
        };

        task.status = TaskStatus::InProgress;
        info!(task_id = %task.id, title = %task.title, "Processing task");

        let status = match timeout(
            self.config.execution_timeout,
            self.executor.execute(&task),
        )
        .await
        {
            Ok(Ok(())) => TaskStatus::Completed,
            Ok(Err(e)) => {
                error!(task_id = %task.id, error = %e, "Task execution failed");
                TaskStatus::Failed
            }
            Err(_) => {
                error!(
                    task_id = %task.id,
                    timeout_secs = self.config.execution_timeout.as_secs(),
                    "Task execution timed out"
                );
                TaskStatus::Failed
            }
        };

        task.status = status;
        info!(task_id = %task.id, status = %status, "Task finished");

        // Best-effort: a notification failure never fails the task.
        if let Err(e) = self.notifier.notify(&task).await {
            warn!(task_id = %task.id, error = %e, "Completion notification failed");
        }

        Iteration::Processed(status)
    }

    /// Run until the shutdown signal flips to `true`.
    ///
    /// The signal is observed between items and during the backoff sleep,
    /// never mid-item: an in-flight task is always finished (the entry was
    /// already removed from the queue on dequeue).
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            queue = %self.config.queue.task_queue,
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Worker started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.run_once().await {
                // An item was consumed; poll again with no delay.
                Iteration::Processed(_) | Iteration::DeadLettered => {}
                Iteration::Empty | Iteration::StoreUnavailable => {
                    tokio::select! {
                        changed = shutdown.changed() => {
                            // A dropped sender means the process is going away.
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = self.clock.sleep(self.config.poll_interval) => {}
                    }
                }
            }
        }

        info!("Worker stopped");
    }

    async fn dead_letter(&self, payload: &[u8]) {
        let dlq = dead_letter_queue(&self.config.queue.task_queue);
        if let Err(e) = self.store.enqueue(&dlq, payload).await {
            error!(error = %e, queue = %dlq, "Failed to park poison payload");
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
