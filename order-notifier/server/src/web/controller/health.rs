use axum::{extract::State, http::StatusCode};
use notifier_axum::response::PlainText;

use crate::ServiceState;

/// Check database reachability
#[utoipa::path(
    get,
    operation_id = "health_check",
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, body = String, content_type = "text/plain"),
        (status = 503, body = String, content_type = "text/plain"),
    )
)]
pub async fn health_check(State(state): State<ServiceState>) -> PlainText {
    match state.processed_orders.ping().await {
        Ok(()) => PlainText::ok("OK"),
        Err(err) => {
            tracing::error!("Health check failed: {err}");
            PlainText::new(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}
