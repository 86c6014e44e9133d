//! Chat webhook channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::channels::DeliveryChannel;
use crate::error::NotifyError;
use crate::request::EventContent;

/// Posts a flattened text rendering of the event to a chat webhook.
pub struct ChatChannel {
    client: Client,
}

impl ChatChannel {
    /// Create the channel with a bounded-timeout HTTP client.
    pub fn new() -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DeliveryChannel for ChatChannel {
    async fn deliver(&self, target: &str, event: &EventContent) -> Result<(), NotifyError> {
        let payload = json!({ "text": event.render_text() });

        let response = self
            .client
            .post(target)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::DeliveryFailed(format!(
                "chat webhook returned HTTP {status}: {body}"
            )));
        }

        debug!(task_id = %event.task_id, "Chat notification delivered");
        Ok(())
    }
}
