//! Item and soldier CRUD routes. Collection paths answer with and without the trailing slash.

use crate::handlers::{
    create_item, create_soldier, delete_item, delete_soldier, list_data, list_items, list_soldiers, read_item,
    read_soldier, update_item, update_soldier,
};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn item_routes(state: AppState) -> Router {
    Router::new()
        .route("/data", get(list_data))
        .route("/get_data", get(list_data))
        .route("/items", get(list_items).post(create_item))
        .route("/items/", get(list_items).post(create_item))
        .route("/items/:item_id", get(read_item).put(update_item).delete(delete_item))
        .with_state(state)
}

pub fn soldier_routes(state: AppState) -> Router {
    Router::new()
        .route("/soldiersdb", get(list_soldiers).post(create_soldier))
        .route("/soldiersdb/", get(list_soldiers).post(create_soldier))
        .route(
            "/soldiersdb/:soldier_id",
            get(read_soldier).put(update_soldier).delete(delete_soldier),
        )
        .with_state(state)
}
