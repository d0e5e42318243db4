use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Executor, Postgres};

use crate::service::dedup::{error, Result};

#[async_trait]
pub trait ProcessedOrderSqlExecutor {
    async fn is_order_processed(&mut self, order_id: &str) -> Result<bool>;

    /// Returns `false` when the order was already recorded.
    async fn insert_processed_order(&mut self, order_id: &str) -> Result<bool>;

    async fn ping_database(&mut self) -> Result<()>;
}

#[async_trait]
impl<E> ProcessedOrderSqlExecutor for E
where
    for<'c> &'c mut E: Executor<'c, Database = Postgres>,
{
    async fn is_order_processed(&mut self, order_id: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(include_str!(
            "../../../sql/processed_order/is_order_processed.sql"
        ))
        .bind(order_id)
        .fetch_one(&mut *self)
        .await
        .context(error::GetProcessedOrderSnafu)
    }

    async fn insert_processed_order(&mut self, order_id: &str) -> Result<bool> {
        let result =
            sqlx::query(include_str!("../../../sql/processed_order/insert_processed_order.sql"))
                .bind(order_id)
                .execute(&mut *self)
                .await
                .context(error::InsertProcessedOrderSnafu)?;

        Ok(result.rows_affected() == 1)
    }

    async fn ping_database(&mut self) -> Result<()> {
        let _one = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&mut *self)
            .await
            .context(error::PingSnafu)?;

        Ok(())
    }
}
