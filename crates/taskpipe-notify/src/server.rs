//! Dispatcher server wiring.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use taskpipe_core::NotifierConfig;

use crate::channels::{ChatChannel, EmailChannel};
use crate::dispatcher::Dispatcher;
use crate::error::NotifyError;
use crate::routes::create_router;
use crate::state::AppState;

/// The notification dispatcher HTTP server.
pub struct NotifierServer {
    config: NotifierConfig,
    state: Arc<AppState>,
}

impl NotifierServer {
    /// Create a server with channels built from the configuration.
    pub fn new(config: NotifierConfig) -> Result<Self, NotifyError> {
        let chat = Arc::new(ChatChannel::new()?);
        let email = Arc::new(EmailChannel::from_config(config.smtp.as_ref())?);
        let state = Arc::new(AppState::new(Dispatcher::new(chat, email)));
        Ok(Self { config, state })
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

        info!("Notification dispatcher listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
