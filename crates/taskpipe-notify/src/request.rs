//! The notification request received on the dispatcher boundary.

use serde::{Deserialize, Serialize};

use taskpipe_core::TaskStatus;

use crate::error::NotifyError;

/// Event fields common to every channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContent {
    /// Id of the task the event is about.
    pub task_id: String,
    /// Terminal (or reported) status of the task.
    pub status: TaskStatus,
    /// Human-readable message.
    pub message: String,
}

impl EventContent {
    /// Flattened text rendering shared by every channel.
    pub fn render_text(&self) -> String {
        format!(
            "Task: {}\nStatus: {}\nMessage: {}",
            self.task_id, self.status, self.message
        )
    }
}

/// A notification request, tagged by channel type.
///
/// The tag decides which targets exist, so invalid combinations (say,
/// `type=email` with no `email_to`) are rejected during deserialization
/// rather than by field checks scattered through the handler. An unknown
/// `type` never reaches a delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifyRequest {
    /// Chat webhook delivery.
    Chat {
        #[serde(flatten)]
        event: EventContent,
        webhook_url: String,
    },
    /// Email delivery.
    Email {
        #[serde(flatten)]
        event: EventContent,
        email_to: String,
    },
    /// Both channels, attempted independently.
    Both {
        #[serde(flatten)]
        event: EventContent,
        webhook_url: String,
        email_to: String,
    },
}

impl NotifyRequest {
    /// The event carried by the request.
    pub fn event(&self) -> &EventContent {
        match self {
            NotifyRequest::Chat { event, .. }
            | NotifyRequest::Email { event, .. }
            | NotifyRequest::Both { event, .. } => event,
        }
    }

    /// Boundary validation: the tag guarantees which targets are present,
    /// but they must also be non-empty.
    pub fn validate(&self) -> Result<(), NotifyError> {
        let (webhook_url, email_to) = match self {
            NotifyRequest::Chat { webhook_url, .. } => (Some(webhook_url), None),
            NotifyRequest::Email { email_to, .. } => (None, Some(email_to)),
            NotifyRequest::Both {
                webhook_url,
                email_to,
                ..
            } => (Some(webhook_url), Some(email_to)),
        };

        if webhook_url.is_some_and(|url| url.trim().is_empty()) {
            return Err(NotifyError::InvalidInput(
                "webhook_url must not be empty".to_string(),
            ));
        }
        if email_to.is_some_and(|to| to.trim().is_empty()) {
            return Err(NotifyError::InvalidInput(
                "email_to must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
