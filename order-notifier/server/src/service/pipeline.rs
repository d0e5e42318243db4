//! Validate, notify and record stages of a new-order request.
//!
//! Each stage consumes the value produced by the previous one, so a later
//! stage cannot run on an order that skipped an earlier one.

use std::sync::Arc;

use order_notifier_core::model::{NewOrderRequest, Order};
use snafu::{ensure, ResultExt};

use crate::service::{
    dedup::{MarkOutcome, ProcessedOrderStore},
    error::{self, Delivery, Error, Result},
    metrics::PipelineMetrics,
    notifier::{NotificationOutcome, NotificationReport, NotifierService},
    order_lookup::OrderLookup,
};

/// An order that exists upstream and was not processed before.
#[derive(Debug)]
pub struct ValidatedOrder {
    order: Order,
}

/// An order for which at least one purchase was notified.
#[derive(Debug)]
pub struct NotifiedOrder {
    order: Order,

    report: NotificationReport,

    delivery: Delivery,
}

/// An order recorded as processed.
#[derive(Debug)]
pub struct RecordedOrder {
    order: Order,

    report: NotificationReport,

    delivery: Delivery,

    mark: MarkOutcome,
}

impl RecordedOrder {
    #[inline]
    #[must_use]
    pub const fn order(&self) -> &Order { &self.order }

    #[inline]
    #[must_use]
    pub const fn report(&self) -> &NotificationReport { &self.report }

    #[inline]
    #[must_use]
    pub const fn delivery(&self) -> Delivery { self.delivery }

    #[inline]
    #[must_use]
    pub const fn mark(&self) -> MarkOutcome { self.mark }
}

#[derive(Clone)]
pub struct OrderPipeline {
    lookup: OrderLookup,

    store: Arc<dyn ProcessedOrderStore>,

    notifier: NotifierService,

    metrics: PipelineMetrics,
}

impl OrderPipeline {
    #[inline]
    #[must_use]
    pub fn new(
        lookup: OrderLookup,
        store: Arc<dyn ProcessedOrderStore>,
        notifier: NotifierService,
        metrics: PipelineMetrics,
    ) -> Self {
        Self { lookup, store, notifier, metrics }
    }

    /// Runs a request through every stage, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the error of the stage that failed.
    #[tracing::instrument(
        skip_all,
        fields(order_number = %request.order_number())
    )]
    pub async fn run(&self, request: NewOrderRequest) -> Result<RecordedOrder> {
        let result = async {
            let validated = self.validate(&request).await?;
            let notified = self.notify(validated).await?;
            self.record(notified).await
        }
        .await;

        match &result {
            Ok(recorded) => {
                self.metrics.observe_order(match recorded.delivery {
                    Delivery::Complete => NotificationOutcome::AllSucceeded.as_str(),
                    Delivery::Partial => NotificationOutcome::PartialSuccess.as_str(),
                });
            }
            Err(err) => self.metrics.observe_order(err.outcome_label()),
        }

        result
    }

    /// Resolves the order and rejects orders that were already processed.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, was processed, or the
    /// store cannot be read.
    pub async fn validate(&self, request: &NewOrderRequest) -> Result<ValidatedOrder> {
        let order = self.lookup.resolve_order(request).await?;

        let processed = self
            .store
            .is_processed(&order.id)
            .await
            .context(error::CheckProcessedOrderSnafu { order_id: order.id.clone() })?;
        ensure!(!processed, error::DuplicateOrderSnafu { order_id: order.id.clone() });

        tracing::info!(order_id = %order.id, purchases = order.purchases.len(), "Order validated");
        Ok(ValidatedOrder { order })
    }

    /// # Errors
    ///
    /// Returns an error if the order has no purchases or no purchase could be
    /// notified.
    pub async fn notify(&self, ValidatedOrder { order }: ValidatedOrder) -> Result<NotifiedOrder> {
        let report = self.notifier.notify_all(&order).await?;
        self.metrics.observe_notifications(report.delivered(), report.failures().len());

        let delivery = match report.outcome() {
            NotificationOutcome::AllSucceeded => Delivery::Complete,
            NotificationOutcome::PartialSuccess => Delivery::Partial,
            NotificationOutcome::AllFailed => {
                return Err(Error::AllNotificationsFailed {
                    order_id: order.id.clone(),
                    purchases: report.total(),
                });
            }
        };

        Ok(NotifiedOrder { order, report, delivery })
    }

    /// Marks the order as processed. Sent mail stays sent if this fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn record(
        &self,
        NotifiedOrder { order, report, delivery }: NotifiedOrder,
    ) -> Result<RecordedOrder> {
        let mark = self.store.mark_processed(&order.id).await.context(
            error::RecordProcessedOrderSnafu { order_id: order.id.clone(), delivery },
        )?;

        if mark == MarkOutcome::AlreadyRecorded {
            tracing::warn!(order_id = %order.id, "Order was recorded by a concurrent request");
        } else {
            tracing::info!(order_id = %order.id, "Order recorded as processed");
        }

        Ok(RecordedOrder { order, report, delivery, mark })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;
    use notification::{EmailMessage, NotificationClient};
    use order_notifier_core::config::RoutingConfig;

    use super::*;
    use crate::{
        order_source::{self, LineItem, OrderSource, UpstreamOrder},
        service::{
            dedup,
            notifier::TemplateRenderer,
            recipient_router::{RecipientRouter, IN_EDMONTON_SKU},
        },
    };

    struct FixedOrders(Vec<UpstreamOrder>);

    #[async_trait]
    impl OrderSource for FixedOrders {
        async fn fetch_orders(&self) -> std::result::Result<Vec<UpstreamOrder>, order_source::Error> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        ids: Mutex<HashSet<String>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    async fn timed_out(operation: &'static str) -> dedup::Error {
        let elapsed =
            tokio::time::timeout(std::time::Duration::ZERO, std::future::pending::<()>())
                .await
                .unwrap_err();
        dedup::Error::Timeout { operation, source: elapsed }
    }

    #[async_trait]
    impl ProcessedOrderStore for MemoryStore {
        async fn is_processed(&self, order_id: &str) -> dedup::Result<bool> {
            if self.fail_reads {
                return Err(timed_out("is_processed").await);
            }
            Ok(self.ids.lock().unwrap().contains(order_id))
        }

        async fn mark_processed(&self, order_id: &str) -> dedup::Result<MarkOutcome> {
            if self.fail_writes {
                return Err(timed_out("mark_processed").await);
            }
            Ok(if self.ids.lock().unwrap().insert(order_id.to_string()) {
                MarkOutcome::Recorded
            } else {
                MarkOutcome::AlreadyRecorded
            })
        }

        async fn ping(&self) -> dedup::Result<()> { Ok(()) }
    }

    #[derive(Default)]
    struct CountingClient {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl NotificationClient for CountingClient {
        async fn send_email(&self, _email: &EmailMessage) -> std::result::Result<(), notification::Error> {
            let _previous = self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn line_item(sku: &str) -> LineItem {
        LineItem {
            sku: sku.to_string(),
            product_name: format!("Product {sku}"),
            ..LineItem::default()
        }
    }

    fn ord_1(skus: &[&str]) -> UpstreamOrder {
        UpstreamOrder {
            id: "id-ord-1".to_string(),
            customer_email: "a@x.com".to_string(),
            order_number: "ORD-1".to_string(),
            line_items: skus.iter().map(|sku| line_item(sku)).collect(),
            ..UpstreamOrder::default()
        }
    }

    fn pipeline(
        orders: Vec<UpstreamOrder>,
        store: Arc<MemoryStore>,
        client: Arc<CountingClient>,
    ) -> OrderPipeline {
        let router = RecipientRouter::from(RoutingConfig {
            in_edmonton: vec!["edmonton@example.com".to_string()],
            outside_edmonton: vec!["rural@example.com".to_string()],
        });
        let notifier = NotifierService::new(
            client,
            router,
            TemplateRenderer::new().unwrap(),
            "orders@example.com".to_string(),
        );
        OrderPipeline::new(
            OrderLookup::new(Arc::new(FixedOrders(orders))),
            store,
            notifier,
            PipelineMetrics::new().unwrap(),
        )
    }

    fn request() -> NewOrderRequest { NewOrderRequest::new("ORD-1", "a@x.com").unwrap() }

    #[tokio::test]
    async fn test_partial_success_is_recorded_and_repeat_is_duplicate() {
        let store = Arc::new(MemoryStore::default());
        let client = Arc::new(CountingClient::default());
        let pipeline =
            pipeline(vec![ord_1(&[IN_EDMONTON_SKU, "UNKNOWN-SKU"])], store.clone(), client.clone());

        let recorded = pipeline.run(request()).await.unwrap();
        assert_eq!(recorded.delivery(), Delivery::Partial);
        assert_eq!(recorded.mark(), MarkOutcome::Recorded);
        assert_eq!(recorded.order().id, "id-ord-1");
        assert_eq!(client.sent.load(Ordering::SeqCst), 1);
        assert!(store.ids.lock().unwrap().contains("id-ord-1"));

        let repeated = pipeline.run(request()).await;
        assert!(matches!(repeated, Err(Error::DuplicateOrder { .. })));
        assert_eq!(client.sent.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.metrics.order_count("partial_success"), 1);
        assert_eq!(pipeline.metrics.order_count("duplicate"), 1);
    }

    #[tokio::test]
    async fn test_unknown_order_sends_nothing() {
        let store = Arc::new(MemoryStore::default());
        let client = Arc::new(CountingClient::default());
        let pipeline = pipeline(vec![ord_1(&[IN_EDMONTON_SKU])], store.clone(), client.clone());

        let result = pipeline.run(NewOrderRequest::new("ORD-1", "b@x.com").unwrap()).await;

        assert!(matches!(result, Err(Error::OrderNotFound { .. })));
        assert_eq!(client.sent.load(Ordering::SeqCst), 0);
        assert!(store.ids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_sends_nothing() {
        let store = Arc::new(MemoryStore { fail_reads: true, ..MemoryStore::default() });
        let client = Arc::new(CountingClient::default());
        let pipeline = pipeline(vec![ord_1(&[IN_EDMONTON_SKU])], store.clone(), client.clone());

        let result = pipeline.run(request()).await;

        assert!(matches!(
            result,
            Err(Error::CheckProcessedOrder { ref order_id, .. }) if order_id == "id-ord-1"
        ));
        assert_eq!(client.sent.load(Ordering::SeqCst), 0);
        assert!(store.ids.lock().unwrap().is_empty());
        assert_eq!(pipeline.metrics.order_count("store_error"), 1);
    }

    #[tokio::test]
    async fn test_all_failed_is_not_recorded() {
        let store = Arc::new(MemoryStore::default());
        let client = Arc::new(CountingClient::default());
        let pipeline = pipeline(vec![ord_1(&["UNKNOWN-SKU"])], store.clone(), client.clone());

        let result = pipeline.run(request()).await;

        assert!(matches!(result, Err(Error::AllNotificationsFailed { purchases: 1, .. })));
        assert!(store.ids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_purchases_is_not_recorded() {
        let store = Arc::new(MemoryStore::default());
        let client = Arc::new(CountingClient::default());
        let pipeline = pipeline(vec![ord_1(&[])], store.clone(), client.clone());

        let result = pipeline.run(request()).await;

        assert!(matches!(result, Err(Error::NoPurchases { .. })));
        assert!(store.ids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_failure_keeps_delivery() {
        let store = Arc::new(MemoryStore { fail_writes: true, ..MemoryStore::default() });
        let client = Arc::new(CountingClient::default());
        let pipeline = pipeline(vec![ord_1(&[IN_EDMONTON_SKU])], store, client.clone());

        let result = pipeline.run(request()).await;

        assert!(matches!(
            result,
            Err(Error::RecordProcessedOrder { delivery: Delivery::Complete, .. })
        ));
        assert_eq!(client.sent.load(Ordering::SeqCst), 1);
    }
}
