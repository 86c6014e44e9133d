//! # Taskpipe Worker
//!
//! The worker loop: polls the queue store, executes dequeued tasks within a
//! bounded time, and reports completion to the notification dispatcher.
//!
//! ## Loop semantics
//!
//! - empty queue: fixed backoff before the next poll, no busy-looping
//! - store unreachable: same backoff, retried indefinitely, never fatal
//! - undeserializable payload: parked on the dead-letter queue, never
//!   silently dropped
//! - notification failures are logged and never fail the task
//! - shutdown is cooperative: the in-flight item is finished, then polling
//!   stops

pub mod clock;
pub mod error;
pub mod executor;
pub mod notifier;
pub mod worker;

pub use clock::{Clock, SystemClock};
pub use error::WorkerError;
pub use executor::{SimulatedExecutor, TaskExecutor};
pub use notifier::{CompletionNotifier, DispatcherClient};
pub use worker::{Iteration, Worker};
