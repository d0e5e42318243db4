use std::{future::Future, net::SocketAddr};

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Router,
};
use bytes::Bytes;
use prometheus::{Encoder, TextEncoder};
use snafu::ResultExt;
use tokio::net::TcpListener;

use crate::{error, Error, Metrics};

/// Serves `GET /metrics` in the Prometheus text format until
/// `shutdown_signal` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn start_metrics_server<M, ShutdownSignal>(
    listen_address: SocketAddr,
    metrics: M,
    shutdown_signal: ShutdownSignal,
) -> Result<(), Error>
where
    M: Metrics + 'static,
    ShutdownSignal: Future<Output = ()> + Send + 'static,
{
    let router = Router::new().route("/metrics", routing::get(gather::<M>)).with_state(metrics);

    let listener = TcpListener::bind(&listen_address)
        .await
        .context(error::BindMetricsServerSnafu { listen_address })?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context(error::ServeMetricsServerSnafu)
}

async fn gather<M>(State(metrics): State<M>) -> Response
where
    M: Metrics,
{
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metrics.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics, error: {err}");
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(Bytes::from(buffer)))
        .expect("Build `Axum` response successfully; qed")
}
