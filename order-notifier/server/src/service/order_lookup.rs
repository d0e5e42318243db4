use std::sync::Arc;

use order_notifier_core::model::{
    Customer, NewOrderRequest, Order, Purchase, SUBJECT_PROPERTY_ADDRESS_LABEL,
};
use snafu::{OptionExt, ResultExt};

use crate::{
    order_source::{LineItem, OrderSource, UpstreamOrder},
    service::error::{self, Result},
};

/// Resolves a new-order request to the matching upstream order.
#[derive(Clone)]
pub struct OrderLookup {
    order_source: Arc<dyn OrderSource>,
}

impl OrderLookup {
    #[inline]
    #[must_use]
    pub fn new(order_source: Arc<dyn OrderSource>) -> Self { Self { order_source } }

    /// # Errors
    ///
    /// Returns `OrderNotFound` if no order matches both the order number and
    /// the customer email, or `FetchOrders` if the listing is unavailable.
    #[tracing::instrument(skip_all, fields(order_number = %request.order_number()))]
    pub async fn resolve_order(&self, request: &NewOrderRequest) -> Result<Order> {
        let orders = self.order_source.fetch_orders().await.context(error::FetchOrdersSnafu)?;

        find_order(&orders, request).map(to_order).with_context(|| {
            error::OrderNotFoundSnafu { order_number: request.order_number().to_string() }
        })
    }
}

/// First order whose number and customer email both match exactly.
#[must_use]
pub fn find_order<'a>(
    orders: &'a [UpstreamOrder],
    request: &NewOrderRequest,
) -> Option<&'a UpstreamOrder> {
    orders.iter().find(|order| {
        order.customer_email == request.customer_email()
            && order.order_number == request.order_number()
    })
}

fn to_order(order: &UpstreamOrder) -> Order {
    let UpstreamOrder { id, customer_email, order_number, billing_address, line_items } = order;

    let customer = Customer {
        first_name: billing_address.first_name.clone().unwrap_or_default(),
        last_name: billing_address.last_name.clone().unwrap_or_default(),
        email: customer_email.clone(),
        phone: billing_address.phone.clone().unwrap_or_default(),
    };

    Order {
        id: id.clone(),
        order_number: order_number.clone(),
        customer,
        purchases: line_items.iter().map(to_purchase).collect(),
    }
}

fn to_purchase(line_item: &LineItem) -> Purchase {
    let subject_address = line_item
        .customizations
        .iter()
        .flatten()
        .find(|customization| customization.label == SUBJECT_PROPERTY_ADDRESS_LABEL)
        .map(|customization| customization.value.clone())
        .unwrap_or_default();

    Purchase {
        sku: line_item.sku.clone(),
        purchase_type: line_item.product_name.clone(),
        subject_address,
        currency: line_item.unit_price_paid.currency.clone(),
        paid_value: line_item.unit_price_paid.value.clone(),
    }
}
