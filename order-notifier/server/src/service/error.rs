use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notifier_axum::text_response;
use snafu::Snafu;

use crate::{order_source, service::dedup};

pub type Result<T> = std::result::Result<T, Error>;

/// How far notification got before recording failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delivery {
    Complete,
    Partial,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error occurs while fetching orders, error: {source}"))]
    FetchOrders { source: order_source::Error },

    #[snafu(display("No order `{order_number}` for the given customer email"))]
    OrderNotFound { order_number: String },

    #[snafu(display("Order entry already processed: {order_id}"))]
    DuplicateOrder { order_id: String },

    #[snafu(display("Fail to check whether order `{order_id}` was processed, error: {source}"))]
    CheckProcessedOrder { order_id: String, source: dedup::Error },

    #[snafu(display("Order `{order_id}` has no valid purchases"))]
    NoPurchases { order_id: String },

    #[snafu(display("Failed to notify any recipient for the {purchases} purchase(s) of order `{order_id}`"))]
    AllNotificationsFailed { order_id: String, purchases: usize },

    #[snafu(display("Fail to record processed order `{order_id}`, error: {source}"))]
    RecordProcessedOrder { order_id: String, delivery: Delivery, source: dedup::Error },
}

impl Error {
    /// Label of `order_notifier_orders_total` for this failure.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self {
            Self::FetchOrders { .. } => "upstream_error",
            Self::OrderNotFound { .. } => "not_found",
            Self::DuplicateOrder { .. } => "duplicate",
            Self::CheckProcessedOrder { .. } | Self::RecordProcessedOrder { .. } => "store_error",
            Self::NoPurchases { .. } => "no_purchases",
            Self::AllNotificationsFailed { .. } => "all_failed",
        }
    }
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            Self::OrderNotFound { .. } => text_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                message: "Invalid order"
            },
            Self::DuplicateOrder { .. } => text_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                message: "Order entry already processed"
            },
            Self::FetchOrders { .. } | Self::CheckProcessedOrder { .. } => text_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Error validating order"
            },
            Self::NoPurchases { .. } => text_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Order has no valid purchases"
            },
            Self::AllNotificationsFailed { .. } => text_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to notify all recipients for purchases."
            },
            Self::RecordProcessedOrder { delivery: Delivery::Complete, .. } => text_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Recipients emailed but could not log order."
            },
            Self::RecordProcessedOrder { delivery: Delivery::Partial, .. } => text_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Recipients partially emailed but could not log order."
            },
        }
    }
}
