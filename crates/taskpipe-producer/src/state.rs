//! Shared producer state.

use std::sync::Arc;

use taskpipe_queue::QueueStore;

/// State shared by all request handlers.
///
/// The queue store client is constructed by the composition root and
/// injected here; there is no ambient singleton. Handlers hold no other
/// mutable state, so the producer is safe under concurrent invocation.
pub struct AppState {
    /// Shared queue store client.
    pub store: Arc<dyn QueueStore>,
    /// Queue name tasks are handed off on.
    pub queue: String,
}

impl AppState {
    /// Create producer state around an injected store.
    pub fn new(store: Arc<dyn QueueStore>, queue: impl Into<String>) -> Self {
        Self {
            store,
            queue: queue.into(),
        }
    }
}
