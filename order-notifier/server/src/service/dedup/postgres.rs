use std::{future::Future, time::Duration};

use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::PgPool;

use crate::service::{
    dedup::{error, MarkOutcome, ProcessedOrderStore, Result},
    sql_executor::ProcessedOrderSqlExecutor,
};

/// `processed_orders` table backed store.
#[derive(Clone, Debug)]
pub struct PostgresProcessedOrderStore {
    db: PgPool,

    operation_timeout: Duration,
}

impl PostgresProcessedOrderStore {
    #[inline]
    #[must_use]
    pub const fn new(db: PgPool, operation_timeout: Duration) -> Self {
        Self { db, operation_timeout }
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        tokio::time::timeout(self.operation_timeout, future)
            .await
            .context(error::TimeoutSnafu { operation })?
    }
}

#[async_trait]
impl ProcessedOrderStore for PostgresProcessedOrderStore {
    async fn is_processed(&self, order_id: &str) -> Result<bool> {
        self.with_timeout("is_processed", async {
            let mut conn = self.db.acquire().await.context(error::AcquireConnectionSnafu)?;
            conn.is_order_processed(order_id).await
        })
        .await
    }

    async fn mark_processed(&self, order_id: &str) -> Result<MarkOutcome> {
        self.with_timeout("mark_processed", async {
            let mut conn = self.db.acquire().await.context(error::AcquireConnectionSnafu)?;
            let inserted = conn.insert_processed_order(order_id).await?;

            Ok(if inserted { MarkOutcome::Recorded } else { MarkOutcome::AlreadyRecorded })
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.with_timeout("ping", async {
            let mut conn = self.db.acquire().await.context(error::AcquireConnectionSnafu)?;
            conn.ping_database().await
        })
        .await
    }
}
