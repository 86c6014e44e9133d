//! Notification handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::info;

use crate::dispatcher::DispatchOutcome;
use crate::error::NotifyError;
use crate::request::NotifyRequest;
use crate::state::AppState;

/// `POST /notify`
///
/// Best-effort fan-out. A single-channel request surfaces its delivery
/// failure as `500`; a `both` request returns `200` with the structured
/// outcome even when a channel failed, which is the documented weak
/// guarantee of the dual-channel path.
pub async fn notify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NotifyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DispatchOutcome>), NotifyError> {
    let Json(request) = payload.map_err(|e| NotifyError::InvalidInput(e.body_text()))?;

    let event = request.event();
    info!(
        task_id = %event.task_id,
        status = %event.status,
        "Notification received"
    );

    let outcome = state.dispatcher.dispatch(&request).await?;

    if !matches!(request, NotifyRequest::Both { .. }) {
        if let Some(reason) = outcome.first_failure() {
            return Err(NotifyError::DeliveryFailed(reason.to_string()));
        }
    }

    Ok((StatusCode::OK, Json(outcome)))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "Notification dispatcher is healthy"
}
