
use super::*;
use crate::channels::DeliveryChannel;
use crate::dispatcher::Dispatcher;
use crate::error::NotifyError;
use crate::request::EventContent;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt;

/// Channel double that records delivery attempts.
#[derive(Default)]
struct RecordingChannel {
    targets: std::sync::Mutex<Vec<String>>,
}

impl RecordingChannel {
    fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    async fn deliver(&self, target: &str, _event: &EventContent) -> Result<(), NotifyError> {
        self.targets.lock().unwrap().push(target.to_string());
        Ok(())
    }
}

/// Channel double whose every attempt fails.
struct DownChannel;

#[async_trait]
impl DeliveryChannel for DownChannel {
    async fn deliver(&self, _target: &str, _event: &EventContent) -> Result<(), NotifyError> {
        Err(NotifyError::DeliveryFailed("unreachable".to_string()))
    }
}

fn create_test_router(
    chat: Arc<dyn DeliveryChannel>,
    email: Arc<dyn DeliveryChannel>,
) -> Router {
    let state = Arc::new(AppState::new(Dispatcher::new(chat, email)));
    create_router(state)
}

fn notify_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/notify")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_unknown_type_is_bad_request_and_never_delivers() {
    let chat = Arc::new(RecordingChannel::default());
    let email = Arc::new(RecordingChannel::default());
    let app = create_test_router(chat.clone(), email.clone());

    let response = app
        .oneshot(notify_request(
            r#"{"type":"invalid","task_id":"t1","status":"completed","message":"done"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(chat.targets().is_empty());
    assert!(email.targets().is_empty());
}

#[tokio::test]
async fn test_missing_target_is_bad_request() {
    let app = create_test_router(
        Arc::new(RecordingChannel::default()),
        Arc::new(RecordingChannel::default()),
    );

    // The tag makes an email request without a recipient unrepresentable.
    let response = app
        .oneshot(notify_request(
            r#"{"type":"email","task_id":"t1","status":"completed","message":"done"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_webhook_target_is_bad_request() {
    let chat = Arc::new(RecordingChannel::default());
    let app = create_test_router(chat.clone(), Arc::new(RecordingChannel::default()));

    let response = app
        .oneshot(notify_request(
            r#"{"type":"chat","task_id":"t1","status":"completed","message":"done","webhook_url":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(chat.targets().is_empty());
}

#[tokio::test]
async fn test_chat_delivery_is_accepted() {
    let chat = Arc::new(RecordingChannel::default());
    let app = create_test_router(chat.clone(), Arc::new(RecordingChannel::default()));

    let response = app
        .oneshot(notify_request(
            r#"{"type":"chat","task_id":"t1","status":"completed","message":"done","webhook_url":"https://chat.example.com/hook"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(chat.targets(), vec!["https://chat.example.com/hook"]);

    let body = response_json(response).await;
    assert_eq!(body["chat"], "delivered");
}

#[tokio::test]
async fn test_single_channel_failure_is_server_error() {
    let app = create_test_router(Arc::new(DownChannel), Arc::new(RecordingChannel::default()));

    let response = app
        .oneshot(notify_request(
            r#"{"type":"chat","task_id":"t1","status":"completed","message":"done","webhook_url":"https://chat.example.com/hook"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_both_still_attempts_email_when_chat_fails() {
    let email = Arc::new(RecordingChannel::default());
    let app = create_test_router(Arc::new(DownChannel), email.clone());

    let response = app
        .oneshot(notify_request(
            r#"{"type":"both","task_id":"t1","status":"completed","message":"done","webhook_url":"https://bad.example.com/hook","email_to":"ops@example.com"}"#,
        ))
        .await
        .unwrap();

    // Best-effort: the call succeeds and the outcome names each channel.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(email.targets(), vec!["ops@example.com"]);

    let body = response_json(response).await;
    assert!(body["chat"]["failed"]["reason"].is_string());
    assert_eq!(body["email"], "delivered");
}

#[tokio::test]
async fn test_both_with_every_channel_down_is_still_accepted() {
    let app = create_test_router(Arc::new(DownChannel), Arc::new(DownChannel));

    let response = app
        .oneshot(notify_request(
            r#"{"type":"both","task_id":"t1","status":"failed","message":"broken","webhook_url":"https://chat.example.com/hook","email_to":"ops@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["chat"]["failed"]["reason"].is_string());
    assert!(body["email"]["failed"]["reason"].is_string());
}

#[tokio::test]
async fn test_health() {
    let app = create_test_router(
        Arc::new(RecordingChannel::default()),
        Arc::new(RecordingChannel::default()),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
