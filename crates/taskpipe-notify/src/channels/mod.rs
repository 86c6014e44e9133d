//! Delivery channels.

mod chat;
mod email;

pub use chat::ChatChannel;
pub use email::EmailChannel;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::request::EventContent;

/// A single outbound delivery channel.
///
/// One attempt per call: no retry, no rate limiting, no confirmation beyond
/// the immediate transport response.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver the event to `target` (a webhook URL for chat, a recipient
    /// address for email).
    async fn deliver(&self, target: &str, event: &EventContent) -> Result<(), NotifyError>;
}
