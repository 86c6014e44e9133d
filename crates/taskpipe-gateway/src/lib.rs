//! # Taskpipe Gateway
//!
//! Reverse proxy in front of the task producer. Public creation requests
//! are forwarded verbatim (body and headers); the producer's status code
//! and body come back unchanged. The gateway holds no state and applies no
//! logic of its own; when the producer is unreachable it answers `503`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use taskpipe_core::GatewayConfig;

/// State shared by the forwarding handlers.
pub struct AppState {
    client: reqwest::Client,
    task_service_url: String,
}

impl AppState {
    /// Create gateway state with a bounded-timeout upstream client.
    pub fn new(task_service_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            task_service_url: task_service_url.into(),
        }
    }
}

/// `GET /health`
async fn health() -> &'static str {
    "Gateway is healthy"
}

/// `POST /create-task`
///
/// Forwards the request to the producer and relays its response.
async fn forward_create_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = format!("{}/create-task", state.task_service_url);

    // The upstream connection supplies its own host header.
    let mut forward_headers = headers.clone();
    forward_headers.remove(header::HOST);

    let request = state
        .client
        .post(&url)
        .headers(forward_headers)
        .body(body);

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, url = %url, "Task producer is unreachable");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "Task producer is unavailable",
            )
                .into_response();
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let body = upstream.bytes().await.unwrap_or_default();

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response
}

/// Build the gateway router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/create-task", post(forward_create_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The gateway HTTP server.
pub struct GatewayServer {
    config: GatewayConfig,
    state: Arc<AppState>,
}

impl GatewayServer {
    /// Create a new server from the configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = Arc::new(AppState::new(config.task_service_url.clone()));
        Self { config, state }
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

        info!("Gateway listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_router(upstream: &str) -> Router {
        create_router(Arc::new(AppState::new(upstream.to_string())))
    }

    fn create_task_request() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/create-task")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"build report"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_forwards_body_and_relays_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-task"))
            .and(header_matcher("content-type", "application/json"))
            .and(body_json(serde_json::json!({"title": "build report"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_raw(r#"{"id":"abc","title":"build report","status":"pending"}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = create_test_router(&server.uri());
        let response = app.oneshot(create_task_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            &bytes[..],
            br#"{"id":"abc","title":"build report","status":"pending"}"#
        );
    }

    #[tokio::test]
    async fn test_relays_error_status_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/create-task"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let app = create_test_router(&server.uri());
        let response = app.oneshot(create_task_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_producer_is_service_unavailable() {
        let app = create_test_router("http://127.0.0.1:1");
        let response = app.oneshot(create_task_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_is_served_locally() {
        // No upstream involved.
        let app = create_test_router("http://127.0.0.1:1");
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
