//! Shared dispatcher state.

use crate::dispatcher::Dispatcher;

/// State shared by all request handlers.
///
/// Channels are constructed by the composition root and injected through
/// the dispatcher; handlers hold no other mutable state.
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}
