//! Fan-out of one event to the requested channels.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::channels::DeliveryChannel;
use crate::error::NotifyError;
use crate::request::{EventContent, NotifyRequest};

/// Result of one channel attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOutcome {
    /// The transport accepted the message.
    Delivered,
    /// The attempt failed; the reason is also logged.
    Failed { reason: String },
}

impl ChannelOutcome {
    fn failure_reason(&self) -> Option<&str> {
        match self {
            ChannelOutcome::Delivered => None,
            ChannelOutcome::Failed { reason } => Some(reason),
        }
    }
}

/// Aggregated fan-out result.
///
/// Channels that were not requested stay `None`; requested channels carry
/// their individual outcome so callers can observe partial failure instead
/// of a single swallowed boolean.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChannelOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<ChannelOutcome>,
}

impl DispatchOutcome {
    /// First failure among the attempted channels, if any.
    pub fn first_failure(&self) -> Option<&str> {
        self.chat
            .as_ref()
            .and_then(ChannelOutcome::failure_reason)
            .or_else(|| self.email.as_ref().and_then(ChannelOutcome::failure_reason))
    }
}

/// Routes one event to zero or more delivery channels.
pub struct Dispatcher {
    chat: Arc<dyn DeliveryChannel>,
    email: Arc<dyn DeliveryChannel>,
}

impl Dispatcher {
    /// Create a dispatcher over injected channels.
    pub fn new(chat: Arc<dyn DeliveryChannel>, email: Arc<dyn DeliveryChannel>) -> Self {
        Self { chat, email }
    }

    /// Validate the request and attempt the requested deliveries.
    ///
    /// For `both`, the two attempts are independent: a failure on one never
    /// prevents the attempt on the other.
    pub async fn dispatch(&self, request: &NotifyRequest) -> Result<DispatchOutcome, NotifyError> {
        request.validate()?;

        let outcome = match request {
            NotifyRequest::Chat { event, webhook_url } => DispatchOutcome {
                chat: Some(self.attempt(&*self.chat, "chat", webhook_url, event).await),
                email: None,
            },
            NotifyRequest::Email { event, email_to } => DispatchOutcome {
                chat: None,
                email: Some(self.attempt(&*self.email, "email", email_to, event).await),
            },
            NotifyRequest::Both {
                event,
                webhook_url,
                email_to,
            } => {
                let (chat, email) = tokio::join!(
                    self.attempt(&*self.chat, "chat", webhook_url, event),
                    self.attempt(&*self.email, "email", email_to, event),
                );
                DispatchOutcome {
                    chat: Some(chat),
                    email: Some(email),
                }
            }
        };

        Ok(outcome)
    }

    async fn attempt(
        &self,
        channel: &dyn DeliveryChannel,
        name: &str,
        target: &str,
        event: &EventContent,
    ) -> ChannelOutcome {
        match channel.deliver(target, event).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(e) => {
                warn!(channel = name, task_id = %event.task_id, error = %e, "Channel delivery failed");
                ChannelOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use taskpipe_core::TaskStatus;

    struct OkChannel;

    #[async_trait]
    impl DeliveryChannel for OkChannel {
        async fn deliver(&self, _target: &str, _event: &EventContent) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    struct DownChannel;

    #[async_trait]
    impl DeliveryChannel for DownChannel {
        async fn deliver(&self, _target: &str, _event: &EventContent) -> Result<(), NotifyError> {
            Err(NotifyError::DeliveryFailed("unreachable".to_string()))
        }
    }

    fn both_request() -> NotifyRequest {
        NotifyRequest::Both {
            event: EventContent {
                task_id: "t1".to_string(),
                status: TaskStatus::Completed,
                message: "done".to_string(),
            },
            webhook_url: "https://chat.example.com/hook".to_string(),
            email_to: "ops@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_both_attempts_are_independent() {
        let dispatcher = Dispatcher::new(Arc::new(DownChannel), Arc::new(OkChannel));

        let outcome = dispatcher.dispatch(&both_request()).await.unwrap();
        assert!(matches!(outcome.chat, Some(ChannelOutcome::Failed { .. })));
        assert_eq!(outcome.email, Some(ChannelOutcome::Delivered));
    }

    #[tokio::test]
    async fn test_single_channel_outcome_reports_failure() {
        let dispatcher = Dispatcher::new(Arc::new(DownChannel), Arc::new(OkChannel));

        let request = NotifyRequest::Chat {
            event: EventContent {
                task_id: "t1".to_string(),
                status: TaskStatus::Failed,
                message: "broken".to_string(),
            },
            webhook_url: "https://chat.example.com/hook".to_string(),
        };

        let outcome = dispatcher.dispatch(&request).await.unwrap();
        assert_eq!(outcome.first_failure(), Some("Delivery failed: unreachable"));
        assert!(outcome.email.is_none());
    }

    #[tokio::test]
    async fn test_invalid_target_never_reaches_a_channel() {
        let dispatcher = Dispatcher::new(Arc::new(OkChannel), Arc::new(OkChannel));

        let request = NotifyRequest::Chat {
            event: EventContent {
                task_id: "t1".to_string(),
                status: TaskStatus::Completed,
                message: "done".to_string(),
            },
            webhook_url: "".to_string(),
        };

        assert!(matches!(
            dispatcher.dispatch(&request).await,
            Err(NotifyError::InvalidInput(_))
        ));
    }
}
