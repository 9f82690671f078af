//! Notification lifecycle endpoints: trigger a person or team notification,
//! stop one by id, and the one-click stop link served from emails.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use bantam_core::ids::NotificationId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationRequest {
    /// Summary or subject line; optional, not every transport uses it.
    #[serde(default)]
    pub summary: String,
    /// The message body to deliver.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub message: String,
    pub content: String,
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub message: String,
    pub uuid: String,
}

pub async fn notify_person(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<NotificationRequest>,
) -> ApiResult<Json<NotifyResponse>> {
    let notification = state
        .resolver
        .resolve_for_person(&username, &request.summary, &request.content)
        .await?;
    let uuid = notification.id().to_string();

    state.engine.enqueue(notification).await;

    Ok(Json(NotifyResponse {
        message: "Notification initiated".into(),
        content: request.content,
        uuid,
        name: username,
    }))
}

pub async fn notify_team(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<NotificationRequest>,
) -> ApiResult<Json<NotifyResponse>> {
    let notification = state
        .resolver
        .resolve_for_team(&name, &request.summary, &request.content)
        .await?;
    let uuid = notification.id().to_string();

    state.engine.enqueue(notification).await;

    Ok(Json(NotifyResponse {
        message: "Notification initiated".into(),
        content: request.content,
        uuid,
        name,
    }))
}

pub async fn stop(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult<Json<StopResponse>> {
    let id = in_flight_id(&state, &uuid)?;
    state.engine.cancel(&id).await;

    Ok(Json(StopResponse {
        message: "Attempting to terminate notification".into(),
        uuid,
    }))
}

/// GET-able stop endpoint for the link embedded in notification emails.
pub async fn stop_click(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> ApiResult<Html<String>> {
    let id = in_flight_id(&state, &uuid)?;
    info!(%id, "stop link clicked");
    state.engine.cancel(&id).await;

    Ok(Html(
        "<html><body><b>Thank you!</b><br><br>Bantam has received your acknowledgement \
         and you will no longer be notified with this message.</body></html>"
            .into(),
    ))
}

/// Parse a path uuid and require it to name an in-flight notification.
fn in_flight_id(state: &AppState, uuid: &str) -> Result<NotificationId, ApiError> {
    let not_found = || ApiError::NotFound(format!("notification {uuid}"));
    let id = NotificationId::parse(uuid).map_err(|_| not_found())?;
    if !state.engine.is_in_flight(&id) {
        return Err(not_found());
    }
    Ok(id)
}
