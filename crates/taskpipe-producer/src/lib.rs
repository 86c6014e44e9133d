//! # Taskpipe Producer
//!
//! HTTP service that accepts task creation requests, assigns identity and
//! initial status, and enqueues the serialized task. Enqueue is the
//! durability boundary: once it succeeds the producer acknowledges without
//! waiting for anything downstream.
//!
//! ## HTTP surface
//!
//! ```text
//! GET  /health      - liveness, 200 plain text
//! POST /create-task - 201 with the created task, 400 invalid body,
//!                     500 store failure
//! GET  /readiness   - 200 if the queue store is reachable, else 503
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ProducerError;
pub use handlers::CreateTaskRequest;
pub use routes::create_router;
pub use server::ProducerServer;
pub use state::AppState;
