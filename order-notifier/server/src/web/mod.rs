pub mod controller;
pub mod error;
pub mod extractor;

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{extract::Request, http, routing, Extension, Json, Router, ServiceExt};
use notifier_axum::text_response;
use order_notifier_core::ServerInfo;
use snafu::ResultExt;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{normalize_path::NormalizePathLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub use self::{controller::ApiDoc, error::Error};
use crate::service::{OrderPipeline, ProcessedOrderStore};

pub async fn new_api_server<ShutdownSignal>(
    socket_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = {
        let router = NormalizePathLayer::trim_trailing_slash()
            .layer(new_router(&service_state, server_info));
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(router)
    };

    let listener = TcpListener::bind(&socket_address).await.context(error::BindTcpServerSnafu)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|err| Error::ServeHttpServer { message: err.to_string() })
}

/// Every route of the service, without path normalization.
pub fn new_router(service_state: &ServiceState, server_info: ServerInfo) -> Router {
    let middleware_stack = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    Router::new()
        // For load balancer default health check
        .route("/", routing::get(controller::server_info))
        .route("/openapi.json", routing::get(openapi_json))
        .merge(controller::api_router(service_state))
        .layer(Extension(server_info))
        .layer(middleware_stack)
        .fallback(fallback)
}

// SAFETY: `axum` handler must be async
#[allow(clippy::unused_async)]
async fn fallback(uri: http::Uri) -> axum::response::Response {
    text_response! {
        status: http::StatusCode::NOT_FOUND,
        message: format!("No route for {uri}")
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> { Json(ApiDoc::openapi()) }

#[derive(Clone)]
pub struct ServiceState {
    pub order_pipeline: Arc<OrderPipeline>,

    pub processed_orders: Arc<dyn ProcessedOrderStore>,
}

impl ServiceState {
    #[must_use]
    pub fn new(order_pipeline: OrderPipeline, processed_orders: Arc<dyn ProcessedOrderStore>) -> Self {
        Self { order_pipeline: Arc::new(order_pipeline), processed_orders }
    }
}
