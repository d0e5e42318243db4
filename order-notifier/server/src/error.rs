use std::borrow::Cow;

use snafu::Snafu;

use crate::{order_source, web};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display(
        "Can not initialize Postgres pool with endpoint \
         `postgres://{username}@{host}:{port}/{database}`, error: {source}"
    ))]
    InitializePostgresPool {
        host: Cow<'static, str>,
        port: u16,
        username: Cow<'static, str>,
        database: Cow<'static, str>,
        source: sqlx::error::Error,
    },

    #[snafu(display("Fail to migrate postgres schema, error: {source}",))]
    MigrateSchema { source: sqlx::migrate::MigrateError },

    #[snafu(display("Error occurs while creating Squarespace client, error: {source}"))]
    CreateOrderSource { source: order_source::Error },

    #[snafu(display("Error occurs while creating SMTP client, error: {source}"))]
    CreateNotificationClient { source: notification::Error },

    #[snafu(display("Sender email address is not configured"))]
    MissingSender,

    #[snafu(display("Fail to parse email template, error: {source}"))]
    ParseTemplate { source: tera::Error },

    #[snafu(display("Fail to create pipeline metrics, error: {source}"))]
    CreatePipelineMetrics { source: prometheus::Error },

    #[snafu(display("{source}"))]
    Metrics { source: notifier_metrics::Error },

    #[snafu(display("{source}"))]
    Web { source: web::Error },
}

impl From<notifier_metrics::Error> for Error {
    fn from(source: notifier_metrics::Error) -> Self { Self::Metrics { source } }
}

impl From<web::Error> for Error {
    fn from(source: web::Error) -> Self { Self::Web { source } }
}
