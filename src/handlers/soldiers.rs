//! Soldier CRUD handlers (`/soldiersdb`).

use crate::error::AppError;
use crate::extractors::{JsonBody, RecordId};
use crate::models::{Soldier, SoldierCreate, SoldierUpdate};
use crate::response::{no_content, success_created, success_many, success_ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

#[utoipa::path(
    get,
    path = "/soldiersdb/",
    tag = "Soldiers",
    responses(
        (status = 200, description = "All soldiers", body = [Soldier]),
        (status = 500, description = "Database error"),
    )
)]
pub async fn list_soldiers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_soldiers().await?;
    Ok(success_many(rows))
}

#[utoipa::path(
    get,
    path = "/soldiersdb/{soldier_id}",
    tag = "Soldiers",
    params(("soldier_id" = i64, Path, description = "Soldier ID")),
    responses(
        (status = 200, description = "Soldier found", body = Soldier),
        (status = 404, description = "Soldier not found"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn read_soldier(
    State(state): State<AppState>,
    RecordId(soldier_id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let soldier = state.store.get_soldier(soldier_id).await?;
    Ok(success_ok(soldier))
}

/// The ID comes from the body; a taken ID is 409 and the stored soldier is left as is.
#[utoipa::path(
    post,
    path = "/soldiersdb/",
    tag = "Soldiers",
    request_body = Soldier,
    responses(
        (status = 201, description = "Soldier created", body = Soldier),
        (status = 409, description = "A soldier with this ID already exists"),
        (status = 422, description = "Invalid body"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn create_soldier(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SoldierCreate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate_soldier(&body)?;
    let soldier = state.store.create_soldier(body).await?;
    tracing::info!(id = soldier.id, "soldier created");
    Ok(success_created(soldier))
}

#[utoipa::path(
    put,
    path = "/soldiersdb/{soldier_id}",
    tag = "Soldiers",
    params(("soldier_id" = i64, Path, description = "Soldier ID")),
    request_body = SoldierUpdate,
    responses(
        (status = 200, description = "Soldier updated", body = Soldier),
        (status = 404, description = "Soldier not found"),
        (status = 422, description = "Invalid body"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn update_soldier(
    State(state): State<AppState>,
    RecordId(soldier_id): RecordId,
    JsonBody(body): JsonBody<SoldierUpdate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate_soldier_update(&body)?;
    let soldier = state.store.update_soldier(soldier_id, body).await?;
    Ok(success_ok(soldier))
}

#[utoipa::path(
    delete,
    path = "/soldiersdb/{soldier_id}",
    tag = "Soldiers",
    params(("soldier_id" = i64, Path, description = "Soldier ID")),
    responses(
        (status = 204, description = "Soldier deleted"),
        (status = 404, description = "Soldier not found"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn delete_soldier(
    State(state): State<AppState>,
    RecordId(soldier_id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_soldier(soldier_id).await?;
    tracing::info!(id = soldier_id, "soldier deleted");
    Ok(no_content())
}
