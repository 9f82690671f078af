//! CRUD for rotation policies. Every mutation pokes the rotation engine so
//! the matching watcher re-reads its policy without waiting out its timer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bantam_core::rotation::RotationPolicy;
use bantam_ports::outbound::RotationPolicyRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(policy): Json<RotationPolicy>,
) -> ApiResult<(StatusCode, Json<RotationPolicy>)> {
    RotationPolicyRepository::save(&state.db, &policy).await?;
    state.rotations.update_policy(&policy.name);
    Ok((StatusCode::CREATED, Json(policy)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<RotationPolicy>>> {
    Ok(Json(RotationPolicyRepository::list_all(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<RotationPolicy>> {
    RotationPolicyRepository::find_by_name(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("rotation policy {name}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(mut policy): Json<RotationPolicy>,
) -> ApiResult<Json<RotationPolicy>> {
    policy.name = name;
    RotationPolicyRepository::save(&state.db, &policy).await?;
    state.rotations.update_policy(&policy.name);
    Ok(Json(policy))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    RotationPolicyRepository::delete(&state.db, &name).await?;
    state.rotations.update_policy(&name);
    Ok(StatusCode::NO_CONTENT)
}
