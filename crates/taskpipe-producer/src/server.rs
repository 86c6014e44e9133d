//! Producer server wiring.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use taskpipe_core::ProducerConfig;
use taskpipe_queue::QueueStore;

use crate::routes::create_router;
use crate::state::AppState;

/// The producer HTTP server.
pub struct ProducerServer {
    config: ProducerConfig,
    state: Arc<AppState>,
}

impl ProducerServer {
    /// Create a new server around an injected queue store.
    pub fn new(config: ProducerConfig, store: Arc<dyn QueueStore>) -> Self {
        let state = Arc::new(AppState::new(store, config.queue.task_queue.clone()));
        Self { config, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Start the server; `shutdown` resolves when the process should stop.
    pub async fn run(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone());

        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Task producer listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
