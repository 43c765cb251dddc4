//! Item CRUD handlers (`/items`) and the legacy `/data` listing.

use crate::error::AppError;
use crate::extractors::{JsonBody, RecordId};
use crate::models::{Item, ItemCreate};
use crate::response::{no_content, success_created, success_many, success_ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

/// All rows of the `data` table.
#[utoipa::path(
    get,
    path = "/items/",
    tag = "CRUD Items",
    responses(
        (status = 200, description = "All items", body = [Item]),
        (status = 500, description = "Database error"),
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list_items().await?;
    Ok(success_many(rows))
}

/// Legacy listing; same rows as `GET /items/`.
#[utoipa::path(
    get,
    path = "/data",
    tag = "Legacy",
    responses(
        (status = 200, description = "All items", body = [Item]),
        (status = 500, description = "Database error"),
    )
)]
pub async fn list_data(state: State<AppState>) -> Result<impl IntoResponse, AppError> {
    list_items(state).await
}

#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "CRUD Items",
    params(("item_id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn read_item(
    State(state): State<AppState>,
    RecordId(item_id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    let item = state.store.get_item(item_id).await?;
    Ok(success_ok(item))
}

#[utoipa::path(
    post,
    path = "/items/",
    tag = "CRUD Items",
    request_body = ItemCreate,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 422, description = "Invalid body"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ItemCreate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate_item(&body)?;
    let item = state.store.create_item(body).await?;
    tracing::info!(id = item.id, "item created");
    Ok(success_created(item))
}

#[utoipa::path(
    put,
    path = "/items/{item_id}",
    tag = "CRUD Items",
    params(("item_id" = i64, Path, description = "Item ID")),
    request_body = ItemCreate,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Invalid body"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    RecordId(item_id): RecordId,
    JsonBody(body): JsonBody<ItemCreate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::validate_item(&body)?;
    let item = state.store.update_item(item_id, body).await?;
    Ok(success_ok(item))
}

#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    tag = "CRUD Items",
    params(("item_id" = i64, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found"),
        (status = 500, description = "Database error"),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    RecordId(item_id): RecordId,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete_item(item_id).await?;
    tracing::info!(id = item_id, "item deleted");
    Ok(no_content())
}
