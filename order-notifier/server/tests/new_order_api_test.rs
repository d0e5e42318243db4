use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use notification::{EmailMessage, NotificationClient};
use order_notifier_core::{config::RoutingConfig, ServerInfo};
use order_notifier_server::{
    order_source::{self, Customization, LineItem, OrderSource, UpstreamOrder},
    service::{
        dedup, MarkOutcome, NotifierService, OrderLookup, OrderPipeline, PipelineMetrics,
        ProcessedOrderStore, RecipientRouter, TemplateRenderer,
    },
    ServiceState,
};

struct FakeOrderSource {
    orders: Vec<UpstreamOrder>,
    unavailable: bool,
}

#[async_trait]
impl OrderSource for FakeOrderSource {
    async fn fetch_orders(&self) -> Result<Vec<UpstreamOrder>, order_source::Error> {
        if self.unavailable {
            return Err(order_source::Error::UnexpectedStatus {
                endpoint: "https://api.squarespace.com/1.0/commerce/orders/".to_string(),
                status: 503,
            });
        }
        Ok(self.orders.clone())
    }
}

#[derive(Default)]
struct FakeStore {
    ids: Mutex<HashSet<String>>,
    fail_reads: bool,
    fail_writes: bool,
}

#[async_trait]
impl ProcessedOrderStore for FakeStore {
    async fn is_processed(&self, order_id: &str) -> dedup::Result<bool> {
        if self.fail_reads {
            return Err(dedup::Error::GetProcessedOrder { source: sqlx::Error::PoolTimedOut });
        }
        Ok(self.ids.lock().unwrap().contains(order_id))
    }

    async fn mark_processed(&self, order_id: &str) -> dedup::Result<MarkOutcome> {
        if self.fail_writes {
            return Err(dedup::Error::InsertProcessedOrder { source: sqlx::Error::PoolTimedOut });
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
struct FakeMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl NotificationClient for FakeMailer {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), notification::Error> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

struct TestContext {
    server: TestServer,
    store: Arc<FakeStore>,
    mailer: Arc<FakeMailer>,
}

fn ord_1(skus: &[&str]) -> UpstreamOrder {
    UpstreamOrder {
        id: "id-ord-1".to_string(),
        customer_email: "a@x.com".to_string(),
        order_number: "ORD-1".to_string(),
        line_items: skus
            .iter()
            .map(|sku| LineItem {
                sku: (*sku).to_string(),
                product_name: "Residential Appraisal".to_string(),
                customizations: Some(vec![Customization {
                    label: "Subject Property Address".to_string(),
                    value: "12 Elm Ave".to_string(),
                }]),
                ..LineItem::default()
            })
            .collect(),
        ..UpstreamOrder::default()
    }
}

fn create_test_context(orders: Vec<UpstreamOrder>, upstream_unavailable: bool) -> TestContext {
    create_test_context_with_store(orders, upstream_unavailable, FakeStore::default())
}

fn create_test_context_with_store(
    orders: Vec<UpstreamOrder>,
    upstream_unavailable: bool,
    store: FakeStore,
) -> TestContext {
    let store = Arc::new(store);
    let mailer = Arc::new(FakeMailer::default());

    let router = RecipientRouter::from(RoutingConfig {
        in_edmonton: vec!["edmonton@example.com".to_string()],
        outside_edmonton: vec!["rural@example.com".to_string()],
    });
    let notifier = NotifierService::new(
        mailer.clone(),
        router,
        TemplateRenderer::new().expect("Failed to parse email template"),
        "orders@example.com".to_string(),
    );
    let order_source = Arc::new(FakeOrderSource { orders, unavailable: upstream_unavailable });
    let pipeline = OrderPipeline::new(
        OrderLookup::new(order_source),
        store.clone(),
        notifier,
        PipelineMetrics::new().expect("Failed to create metrics"),
    );

    let server_info = ServerInfo {
        version: "0.1.0".to_string(),
        branch: "main".to_string(),
        commit_hash: "0000000".to_string(),
        start_time: chrono::Utc::now(),
    };
    let app = order_notifier_server::new_router(
        &ServiceState::new(pipeline, store.clone()),
        server_info,
    );

    TestContext {
        server: TestServer::new(app).expect("Failed to create test server"),
        store,
        mailer,
    }
}

#[tokio::test]
async fn test_new_order_partial_success_then_duplicate() {
    let ctx = create_test_context(vec![ord_1(&["SQ5929745", "UNKNOWN-SKU"])], false);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::MULTI_STATUS);
    assert_eq!(response.text(), "Partially failed. Could not notify all recipients for purchases.");
    {
        let sent = ctx.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["edmonton@example.com"]);
        assert_eq!(sent[0].subject, "New Order: Residential Appraisal");
        assert!(sent[0].html_body.contains("12 Elm Ave"));
    }
    assert!(ctx.store.ids.lock().unwrap().contains("id-ord-1"));

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Order entry already processed");
    assert_eq!(ctx.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_new_order_all_succeeded() {
    let ctx = create_test_context(vec![ord_1(&["SQ5929745", "SQ8618609"])], false);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "Successfully notified recipients for all purchases.");
    assert_eq!(ctx.mailer.sent.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_new_order_missing_parameter() {
    let ctx = create_test_context(vec![ord_1(&["SQ5929745"])], false);

    let response = ctx.server.get("/newOrder").add_query_param("orderId", "ORD-1").await;
    assert_eq!(response.status_code(), StatusCode::PRECONDITION_FAILED);
    assert_eq!(response.text(), "No order specified");

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;
    assert_eq!(response.status_code(), StatusCode::PRECONDITION_FAILED);
    assert!(ctx.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_email_mismatch() {
    let ctx = create_test_context(vec![ord_1(&["SQ5929745"])], false);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "b@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Invalid order");
    assert!(ctx.store.ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_upstream_failure() {
    let ctx = create_test_context(Vec::new(), true);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Error validating order");
}

#[tokio::test]
async fn test_new_order_all_notifications_failed() {
    let ctx = create_test_context(vec![ord_1(&["UNKNOWN-SKU"])], false);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Failed to notify all recipients for purchases.");
    assert!(ctx.store.ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_without_purchases() {
    let ctx = create_test_context(vec![ord_1(&[])], false);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Order has no valid purchases");
    assert!(ctx.mailer.sent.lock().unwrap().is_empty());
    assert!(ctx.store.ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_store_read_failure() {
    let store = FakeStore { fail_reads: true, ..FakeStore::default() };
    let ctx = create_test_context_with_store(vec![ord_1(&["SQ5929745"])], false, store);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Error validating order");
    assert!(ctx.mailer.sent.lock().unwrap().is_empty());
    assert!(ctx.store.ids.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_order_store_write_failure() {
    let store = FakeStore { fail_writes: true, ..FakeStore::default() };
    let ctx = create_test_context_with_store(vec![ord_1(&["SQ5929745"])], false, store);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Recipients emailed but could not log order.");
    assert_eq!(ctx.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_new_order_store_write_failure_after_partial_delivery() {
    let store = FakeStore { fail_writes: true, ..FakeStore::default() };
    let ctx =
        create_test_context_with_store(vec![ord_1(&["SQ5929745", "UNKNOWN-SKU"])], false, store);

    let response = ctx
        .server
        .get("/newOrder")
        .add_query_param("orderId", "ORD-1")
        .add_query_param("customerEmailAddress", "a@x.com")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Recipients partially emailed but could not log order.");
    assert_eq!(ctx.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_health_and_info() {
    let ctx = create_test_context(Vec::new(), false);

    let response = ctx.server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let info: serde_json::Value = ctx.server.get("/api/v1/info").await.json();
    assert_eq!(info["commitHash"], "0000000");

    let response = ctx.server.get("/no-such-route").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
