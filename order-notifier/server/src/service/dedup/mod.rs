//! Persisted set of processed order identifiers.

pub mod error;
mod postgres;

use async_trait::async_trait;

pub use self::{
    error::{Error, Result},
    postgres::PostgresProcessedOrderStore,
};

/// Result of recording an order as processed. Both variants mean the order is
/// now recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkOutcome {
    Recorded,

    /// Another request recorded the same order first; the existing record is
    /// left untouched.
    AlreadyRecorded,
}

#[async_trait]
pub trait ProcessedOrderStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached within its timeout.
    async fn is_processed(&self, order_id: &str) -> Result<bool>;

    /// Records `order_id`. Never overwrites an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached within its timeout.
    async fn mark_processed(&self, order_id: &str) -> Result<MarkOutcome>;

    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn ping(&self) -> Result<()>;
}
