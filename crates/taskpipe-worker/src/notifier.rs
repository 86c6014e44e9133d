//! Completion notification client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use taskpipe_core::{NotifyTarget, Task, TaskStatus};

use crate::error::WorkerError;

/// Sink for completion events.
///
/// Fire-and-forget from the worker's perspective: the worker logs a
/// delivery failure and moves on, it never fails the task over it.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    /// Report a task that reached a terminal status.
    async fn notify(&self, task: &Task) -> Result<(), WorkerError>;
}

/// HTTP client for the notification dispatcher.
pub struct DispatcherClient {
    client: Client,
    base_url: String,
    target: NotifyTarget,
}

impl DispatcherClient {
    /// Create a client for the dispatcher at `base_url`, routing events per
    /// `target`.
    pub fn new(base_url: impl Into<String>, target: NotifyTarget) -> Result<Self, WorkerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WorkerError::NotificationFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            target,
        })
    }

    fn message_for(status: TaskStatus) -> &'static str {
        match status {
            TaskStatus::Completed => "Task has been processed successfully",
            TaskStatus::Failed => "Task execution failed",
            TaskStatus::Pending | TaskStatus::InProgress => "Task status update",
        }
    }

    /// Dispatcher request body for `task`, or `None` when notifications are
    /// disabled.
    fn request_body(&self, task: &Task) -> Option<serde_json::Value> {
        let message = Self::message_for(task.status);
        let body = match &self.target {
            NotifyTarget::None => return None,
            NotifyTarget::Chat { webhook_url } => json!({
                "type": "chat",
                "task_id": task.id,
                "status": task.status,
                "message": message,
                "webhook_url": webhook_url,
            }),
            NotifyTarget::Email { email_to } => json!({
                "type": "email",
                "task_id": task.id,
                "status": task.status,
                "message": message,
                "email_to": email_to,
            }),
            NotifyTarget::Both {
                webhook_url,
                email_to,
            } => json!({
                "type": "both",
                "task_id": task.id,
                "status": task.status,
                "message": message,
                "webhook_url": webhook_url,
                "email_to": email_to,
            }),
        };
        Some(body)
    }
}

#[async_trait]
impl CompletionNotifier for DispatcherClient {
    async fn notify(&self, task: &Task) -> Result<(), WorkerError> {
        let Some(body) = self.request_body(task) else {
            return Ok(());
        };

        let response = self
            .client
            .post(format!("{}/notify", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkerError::NotificationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WorkerError::NotificationFailed(format!("HTTP {status}")));
        }

        debug!(task_id = %task.id, "Completion notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completed_task() -> Task {
        let mut task = Task::new("notify me");
        task.status = TaskStatus::Completed;
        task
    }

    #[tokio::test]
    async fn test_chat_notification_posted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .and(body_partial_json(json!({
                "type": "chat",
                "status": "completed",
                "webhook_url": "https://chat.example.com/hook",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = DispatcherClient::new(
            server.uri(),
            NotifyTarget::Chat {
                webhook_url: "https://chat.example.com/hook".to_string(),
            },
        )
        .unwrap();

        client.notify(&completed_task()).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_response_is_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = DispatcherClient::new(
            server.uri(),
            NotifyTarget::Email {
                email_to: "ops@example.com".to_string(),
            },
        )
        .unwrap();

        let result = client.notify(&completed_task()).await;
        assert!(matches!(result, Err(WorkerError::NotificationFailed(_))));
    }

    #[tokio::test]
    async fn test_disabled_target_sends_nothing() {
        // No server at this address; a request would fail loudly.
        let client =
            DispatcherClient::new("http://127.0.0.1:1", NotifyTarget::None).unwrap();
        client.notify(&completed_task()).await.unwrap();
    }

    #[test]
    fn test_both_body_carries_both_targets() {
        let client = DispatcherClient::new(
            "http://localhost:8083",
            NotifyTarget::Both {
                webhook_url: "https://chat.example.com/hook".to_string(),
                email_to: "ops@example.com".to_string(),
            },
        )
        .unwrap();

        let body = client.request_body(&completed_task()).unwrap();
        assert_eq!(body["type"], "both");
        assert_eq!(body["webhook_url"], "https://chat.example.com/hook");
        assert_eq!(body["email_to"], "ops@example.com");
        assert_eq!(body["status"], "completed");
    }
}
