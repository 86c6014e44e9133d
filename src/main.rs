//! Taskpipe - asynchronous task-processing pipeline.
//!
//! Main entry point for the pipeline services. Each subcommand runs one
//! service as an independent process:
//!
//! - `producer` - HTTP task creation, enqueues onto the shared queue
//! - `worker` - dequeues and executes tasks, reports completion
//! - `notifier` - fans completion events out to chat/email channels
//! - `gateway` - reverse proxy in front of the producer

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskpipe_core::{
    GatewayConfig, NotifierConfig, ProducerConfig, QueueBackend, QueueConfig, WorkerConfig,
};
use taskpipe_gateway::GatewayServer;
use taskpipe_notify::NotifierServer;
use taskpipe_producer::ProducerServer;
use taskpipe_queue::{FileQueueStore, MemoryQueueStore, QueueStore};
use taskpipe_worker::{DispatcherClient, SimulatedExecutor, SystemClock, Worker};

/// Taskpipe CLI.
#[derive(Parser)]
#[command(name = "taskpipe")]
#[command(about = "Asynchronous task-processing pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the task producer HTTP service
    Producer,
    /// Run a worker loop instance
    Worker,
    /// Run the notification dispatcher HTTP service
    Notifier,
    /// Run the reverse-proxy gateway
    Gateway,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Build the queue store selected by the configuration.
///
/// The startup ping doubles as the fail-fast connection check: a service
/// never starts against a store it cannot reach. Transient store failures
/// after startup are handled by the worker's retry policy instead.
async fn build_store(config: &QueueConfig) -> anyhow::Result<Arc<dyn QueueStore>> {
    let store: Arc<dyn QueueStore> = match config.backend {
        QueueBackend::Memory => Arc::new(MemoryQueueStore::new()),
        QueueBackend::File => Arc::new(FileQueueStore::new(config.path.clone()).await?),
    };
    store.ping().await?;
    Ok(store)
}

/// Resolves when the process receives a shutdown signal.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Producer => run_producer().await,
        Commands::Worker => run_worker().await,
        Commands::Notifier => run_notifier().await,
        Commands::Gateway => run_gateway().await,
    }
}

async fn run_producer() -> anyhow::Result<()> {
    let config = ProducerConfig::from_env()?;
    let store = build_store(&config.queue).await?;

    info!("Starting task producer v{}", env!("CARGO_PKG_VERSION"));
    let server = ProducerServer::new(config, store);
    server
        .run(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

async fn run_worker() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env()?;
    let store = build_store(&config.queue).await?;

    let executor = Arc::new(SimulatedExecutor::new(config.simulated_work));
    let notifier = Arc::new(DispatcherClient::new(
        config.notifier_url.clone(),
        config.notify_target.clone(),
    )?);

    info!("Starting worker v{}", env!("CARGO_PKG_VERSION"));
    let worker = Worker::new(config, store, executor, notifier, Arc::new(SystemClock));

    // Cooperative stop: the signal flips the watch, the loop finishes its
    // in-flight item and exits before the next poll.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    worker.run(shutdown_rx).await;
    Ok(())
}

async fn run_notifier() -> anyhow::Result<()> {
    let config = NotifierConfig::from_env()?;

    info!("Starting notification dispatcher v{}", env!("CARGO_PKG_VERSION"));
    let server = NotifierServer::new(config)?;
    server
        .run(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}

async fn run_gateway() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;

    info!("Starting gateway v{}", env!("CARGO_PKG_VERSION"));
    let server = GatewayServer::new(config);
    server
        .run(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(())
}
