//! OpenAPI document for the CRUD surface, served at GET /openapi.json.

use crate::handlers::{items, soldiers};
use crate::models::{Item, ItemCreate, Soldier, SoldierUpdate};
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Data Loader Service",
        description = "CRUD over the data (items) and soldiers tables in MySQL."
    ),
    paths(
        items::list_data,
        items::list_items,
        items::read_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        soldiers::list_soldiers,
        soldiers::read_soldier,
        soldiers::create_soldier,
        soldiers::update_soldier,
        soldiers::delete_soldier,
    ),
    components(schemas(Item, ItemCreate, Soldier, SoldierUpdate)),
    tags(
        (name = "Legacy", description = "Legacy listing endpoints"),
        (name = "CRUD Items", description = "Rows of the data table"),
        (name = "Soldiers", description = "Rows of the soldiers table"),
    )
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn docs_routes() -> Router {
    Router::new().route("/openapi.json", get(openapi))
}
