use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Fail to acquire database connection, error: {source}"))]
    AcquireConnection { source: sqlx::Error },

    #[snafu(display("Fail to check processed order, error: {source}"))]
    GetProcessedOrder { source: sqlx::Error },

    #[snafu(display("Fail to insert processed order, error: {source}"))]
    InsertProcessedOrder { source: sqlx::Error },

    #[snafu(display("Fail to ping database, error: {source}"))]
    Ping { source: sqlx::Error },

    #[snafu(display("Processed order store did not answer `{operation}` in time"))]
    Timeout { operation: &'static str, source: tokio::time::error::Elapsed },
}
