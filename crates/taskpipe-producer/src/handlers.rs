//! Task creation and probe handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

use taskpipe_core::Task;

use crate::error::ProducerError;
use crate::state::AppState;

/// Request to create a task.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Free-form task title.
    pub title: String,
}

/// `POST /create-task`
///
/// Assigns a fresh id and `pending` status, serializes the task and hands
/// it to the queue store. An enqueue failure means the task is not created.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ProducerError> {
    let Json(request) = payload.map_err(|e| ProducerError::InvalidInput(e.body_text()))?;

    let task = Task::new(request.title);
    let serialized = serde_json::to_vec(&task)?;
    state.store.enqueue(&state.queue, &serialized).await?;

    info!(
        task_id = %task.id,
        created_at = %task.created_at,
        queue = %state.queue,
        "New task created"
    );

    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "Task producer is healthy"
}

/// `GET /readiness`
///
/// Ready only when the queue store answers a probe.
pub async fn readiness(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    match state.store.ping().await {
        Ok(()) => Ok("ready"),
        Err(e) => {
            warn!(error = %e, "Queue store is not ready");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
