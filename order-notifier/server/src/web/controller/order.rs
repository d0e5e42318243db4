use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
};
use notifier_axum::{get_request_ip, response::PlainText};
use order_notifier_core::model::{NewOrderParams, NewOrderRequest};

use crate::{
    service::Delivery,
    web::{controller::Result, extractor::ValidatedQuery},
    ServiceState,
};

/// Notify recipients of a new order
#[utoipa::path(
    get,
    operation_id = "new_order",
    path = "/newOrder",
    tag = "Orders",
    params(NewOrderParams),
    responses(
        (status = 200, description = "Every purchase notified and the order recorded", body = String, content_type = "text/plain"),
        (status = 207, description = "Some purchases notified and the order recorded", body = String, content_type = "text/plain"),
        (status = 400, description = "Unknown or already processed order", body = String, content_type = "text/plain"),
        (status = 412, description = "Missing `orderId` or `customerEmailAddress`", body = String, content_type = "text/plain"),
        (status = 500, description = "Upstream, notification or store failure", body = String, content_type = "text/plain"),
    )
)]
pub async fn new_order(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    ValidatedQuery(params): ValidatedQuery<NewOrderParams>,
) -> Result<PlainText> {
    if let Some(ConnectInfo(addr)) = connect_info {
        tracing::info!(client_ip = %get_request_ip(&headers, &addr), "Received new order request");
    }

    let request = NewOrderRequest::try_from(params)?;

    let recorded = state.order_pipeline.run(request).await?;

    Ok(match recorded.delivery() {
        Delivery::Complete => PlainText::ok("Successfully notified recipients for all purchases."),
        Delivery::Partial => PlainText::new(
            StatusCode::MULTI_STATUS,
            "Partially failed. Could not notify all recipients for purchases.",
        ),
    })
}
