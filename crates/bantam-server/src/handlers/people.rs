//! CRUD for people and their notification plans.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bantam_core::person::Person;
use bantam_core::plan::NotificationPlan;
use bantam_ports::outbound::{NotificationPlanRepository, PersonRepository};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(person): Json<Person>,
) -> ApiResult<(StatusCode, Json<Person>)> {
    PersonRepository::save(&state.db, &person).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Person>>> {
    Ok(Json(PersonRepository::list_all(&state.db).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Person>> {
    PersonRepository::find_by_username(&state.db, &username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("person {username}")))
}

pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(mut person): Json<Person>,
) -> ApiResult<Json<Person>> {
    person.username = username;
    PersonRepository::save(&state.db, &person).await?;
    Ok(Json(person))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    PersonRepository::delete(&state.db, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upsert_plan(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(mut plan): Json<NotificationPlan>,
) -> ApiResult<(StatusCode, Json<NotificationPlan>)> {
    plan.username = username;
    NotificationPlanRepository::save(&state.db, &plan).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn show_plan(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<NotificationPlan>> {
    NotificationPlanRepository::find_by_username(&state.db, &username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("notification plan for {username}")))
}

pub async fn remove_plan(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<StatusCode> {
    NotificationPlanRepository::delete(&state.db, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
