//! CRUD for teams.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bantam_core::team::Team;
use bantam_ports::outbound::TeamRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    TeamRepository::save(&state.db, &team).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(TeamRepository::list_all(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Team>> {
    TeamRepository::find_by_name(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("team {name}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(mut team): Json<Team>,
) -> ApiResult<Json<Team>> {
    team.name = name;
    TeamRepository::save(&state.db, &team).await?;
    Ok(Json(team))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    TeamRepository::delete(&state.db, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
