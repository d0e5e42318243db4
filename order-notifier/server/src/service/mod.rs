pub mod dedup;
pub mod error;
mod metrics;
pub mod notifier;
pub mod order_lookup;
pub mod pipeline;
pub mod recipient_router;
mod sql_executor;

pub use self::{
    dedup::{MarkOutcome, PostgresProcessedOrderStore, ProcessedOrderStore},
    error::{Delivery, Error, Result},
    metrics::PipelineMetrics,
    notifier::{NotificationOutcome, NotifierService, TemplateRenderer},
    order_lookup::OrderLookup,
    pipeline::{OrderPipeline, RecordedOrder},
    recipient_router::RecipientRouter,
};
