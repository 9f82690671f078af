//! CRUD for escalation plans.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bantam_core::escalation::EscalationPlan;
use bantam_ports::outbound::EscalationPlanRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(plan): Json<EscalationPlan>,
) -> ApiResult<(StatusCode, Json<EscalationPlan>)> {
    EscalationPlanRepository::save(&state.db, &plan).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<EscalationPlan>>> {
    Ok(Json(EscalationPlanRepository::list_all(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<EscalationPlan>> {
    EscalationPlanRepository::find_by_name(&state.db, &name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("escalation plan {name}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(mut plan): Json<EscalationPlan>,
) -> ApiResult<Json<EscalationPlan>> {
    plan.name = name;
    EscalationPlanRepository::save(&state.db, &plan).await?;
    Ok(Json(plan))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    EscalationPlanRepository::delete(&state.db, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}
