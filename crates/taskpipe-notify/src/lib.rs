//! # Taskpipe Notify
//!
//! Notification dispatcher: receives task status events on a synchronous
//! HTTP boundary and fans them out to delivery channels (chat webhook,
//! email). Delivery is best-effort: no retry, no confirmation beyond the
//! immediate HTTP/SMTP response, and for dual-channel requests the two
//! attempts are independent, aggregated into a structured outcome so
//! callers can observe partial failure.
//!
//! ## HTTP surface
//!
//! ```text
//! GET  /health - liveness, 200 plain text
//! POST /notify - 200 accepted (best-effort), 400 invalid type or missing
//!                target, 500 total delivery failure on a single channel
//! ```

pub mod channels;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod request;
pub mod routes;
pub mod server;
pub mod state;

pub use channels::{ChatChannel, DeliveryChannel, EmailChannel};
pub use dispatcher::{ChannelOutcome, DispatchOutcome, Dispatcher};
pub use error::NotifyError;
pub use request::{EventContent, NotifyRequest};
pub use routes::create_router;
pub use server::NotifierServer;
pub use state::AppState;
