mod error;
pub mod order_source;
pub mod service;
mod web;

use std::{net::SocketAddr, sync::Arc};

use futures::{future::BoxFuture, FutureExt};
use notifier_metrics::DefaultMetrics;
use order_notifier_core::{
    config::{Config, PostgresConfig, SmtpConfig},
    ServerInfo, PROJECT_NAME_WITH_INITIAL_CAPITAL,
};
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::{ensure, ResultExt};
use sqlx::{
    migrate::Migrator,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::Instrument;

pub use self::{
    error::{Error, Result},
    web::{new_router, ApiDoc, ServiceState},
};
use self::{
    order_source::SquarespaceClient,
    service::{
        NotifierService, OrderLookup, OrderPipeline, PipelineMetrics, PostgresProcessedOrderStore,
        RecipientRouter, TemplateRenderer,
    },
};

const MIGRATOR: Migrator = Migrator { ignore_missing: true, ..sqlx::migrate!() };

/// # Errors
/// Returns errors when server fails to start
pub async fn serve_with_shutdown(config: Config, server_info: ServerInfo) -> Result<()> {
    let Config { web, postgres, metrics, squarespace, smtp, routing } = config;

    tracing::info!("Starting {PROJECT_NAME_WITH_INITIAL_CAPITAL} {}", server_info.version);

    let database = initialize_postgres_pool(&postgres).await?;
    let processed_orders =
        Arc::new(PostgresProcessedOrderStore::new(database, postgres.operation_timeout));

    let order_source =
        Arc::new(SquarespaceClient::new(squarespace).context(error::CreateOrderSourceSnafu)?);

    let notifier = initialize_notifier(smtp, RecipientRouter::from(routing))?;

    let default_metrics = DefaultMetrics::new()?;
    let pipeline_metrics = PipelineMetrics::new().context(error::CreatePipelineMetricsSnafu)?;
    pipeline_metrics.register(&default_metrics)?;

    let order_pipeline = OrderPipeline::new(
        OrderLookup::new(order_source),
        processed_orders.clone(),
        notifier,
        pipeline_metrics,
    );
    let service_state = ServiceState::new(order_pipeline, processed_orders);

    let lifecycle_manager = LifecycleManager::<Error>::new();

    let _handle = lifecycle_manager.spawn(
        "Http Server",
        create_web_http_server_future(web.listen_address, service_state, server_info),
    );

    if metrics.enable {
        let _handle = lifecycle_manager.spawn(
            "Metrics server",
            create_metrics_server_future(metrics.listen_address, default_metrics),
        );
    }

    if let Ok(Err(err)) = lifecycle_manager.serve().await {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

#[tracing::instrument(
    skip(password, database, ssl_mode, max_connections, operation_timeout),
    fields(
        host = %host,
        port = port,
        username = %username
    )
)]
async fn initialize_postgres_pool(
    PostgresConfig {
        host,
        port,
        database,
        username,
        password,
        ssl_mode,
        max_connections,
        application_name,
        operation_timeout,
    }: &PostgresConfig,
) -> Result<PgPool> {
    tracing::info!("Initializing database");

    let connect_opts = PgConnectOptions::new_without_pgpass()
        .host(host)
        .port(*port)
        .username(username)
        .password(password)
        .database(database)
        .ssl_mode(*ssl_mode);

    // append application name if provided
    let connect_opts = if let Some(app_name) = application_name {
        connect_opts.application_name(app_name)
    } else {
        connect_opts
    };

    let pool = PgPoolOptions::new()
        .max_connections(*max_connections)
        .acquire_timeout(*operation_timeout)
        .connect_with(connect_opts)
        .await
        .context(error::InitializePostgresPoolSnafu {
            host: host.to_string(),
            port: *port,
            username: username.to_string(),
            database: database.to_string(),
        })?;

    MIGRATOR
        .run(&pool)
        .instrument(tracing::info_span!("migrate"))
        .await
        .context(error::MigrateSchemaSnafu)?;

    Ok(pool)
}

#[tracing::instrument(skip_all, fields(host = %smtp.transport.host, sender = %smtp.sender))]
fn initialize_notifier(smtp: SmtpConfig, router: RecipientRouter) -> Result<NotifierService> {
    let SmtpConfig { transport, sender } = smtp;

    ensure!(!sender.trim().is_empty(), error::MissingSenderSnafu);

    let client = notification::smtp::Client::new(transport)
        .context(error::CreateNotificationClientSnafu)?;
    let renderer = TemplateRenderer::new().context(error::ParseTemplateSnafu)?;

    Ok(NotifierService::new(Arc::new(client), router, renderer, sender))
}

fn create_web_http_server_future(
    listen_address: SocketAddr,
    service_state: ServiceState,
    server_info: ServerInfo,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>> {
    move |shutdown_signal| {
        async move {
            tracing::info!("Listen Web HTTP server endpoint on {listen_address}");

            let result =
                web::new_api_server(listen_address, service_state, server_info, shutdown_signal)
                    .await;

            match result {
                Ok(()) => {
                    tracing::info!("HTTP server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}

fn create_metrics_server_future<Metrics>(
    listen_address: SocketAddr,
    metrics: Metrics,
) -> impl FnOnce(Shutdown) -> BoxFuture<'static, ExitStatus<Error>>
where
    Metrics: notifier_metrics::Metrics + 'static,
{
    move |signal| {
        async move {
            tracing::info!("Listen metrics endpoint on {listen_address}");
            let result = notifier_metrics::start_metrics_server(listen_address, metrics, signal).await;
            match result {
                Ok(()) => {
                    tracing::info!("Metrics server is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::FatalError(Error::from(err)),
            }
        }
        .boxed()
    }
}
