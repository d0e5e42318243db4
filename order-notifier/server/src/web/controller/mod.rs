// FIXME: remove this after this utoipa issue is fixed: https://github.com/juhaku/utoipa/pull/1423
#![allow(clippy::needless_for_each)]
mod error;
mod health;
mod order;

use axum::{routing, Extension, Json, Router};
use order_notifier_core::{model::NewOrderParams, ServerInfo};
use utoipa::OpenApi;

pub use self::error::{Error, Result};
use crate::ServiceState;

pub fn api_router(service_state: &ServiceState) -> Router {
    Router::new()
        .route("/newOrder", routing::get(order::new_order))
        .route("/healthz", routing::get(health::health_check))
        .route("/api/v1/info", routing::get(server_info))
        .with_state(service_state.clone())
}

/// Get server info
#[utoipa::path(
    get,
    operation_id = "get_server_info",
    path = "/api/v1/info",
    responses(
        (status = 200, body = ServerInfo)
    )
)]
pub async fn server_info(Extension(server_info): Extension<ServerInfo>) -> Json<ServerInfo> {
    Json(server_info)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        server_info,
        order::new_order,
        health::health_check,
    ),
    components(schemas(ServerInfo, NewOrderParams)),
    tags(
        (name = "Orders", description = "New order notifications"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
