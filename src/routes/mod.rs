//! Router assembly: common, CRUD and docs routes plus the tower-http layers.

mod common;
mod docs;
mod entity;

pub use common::common_routes;
pub use docs::{docs_routes, ApiDoc};
pub use entity::{item_routes, soldier_routes};

use crate::config::ServerConfig;
use crate::error::{ErrorBody, ErrorDetail};
use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The full service: every route with timeout, body limit, panic catching and request tracing.
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let routes = Router::new()
        .merge(common_routes(state.clone()))
        .merge(item_routes(state.clone()))
        .merge(soldier_routes(state))
        .merge(docs_routes());
    with_layers(routes, server)
}

pub fn with_layers(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::new(server.request_timeout))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "handler panicked");
    let body = ErrorBody {
        error: ErrorDetail {
            code: "internal_error".into(),
            message: "An unexpected error occurred".into(),
        },
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
