mod processed_order;

pub use self::processed_order::ProcessedOrderSqlExecutor;
