//! # Taskpipe Queue
//!
//! Shared FIFO queue store used as the hand-off point between the producer
//! and the worker loop.
//!
//! ## Contract
//!
//! - enqueue-at-tail, dequeue-at-head, per queue name
//! - `dequeue` on an empty queue is an explicit "nothing to do", not an
//!   error; store failures are a separate, retryable condition
//! - an enqueued item is visible to the next `dequeue` call
//! - no two consumers successfully observe the same entry

pub mod error;
pub mod store;

pub use error::QueueError;
pub use store::{FileQueueStore, MemoryQueueStore, QueueStore, dead_letter_queue};
