use std::{fmt::Debug, net::SocketAddr, time::Duration};

use sqlx::postgres::PgSslMode;

#[derive(Clone, Debug)]
pub struct Config {
    pub web: WebConfig,

    pub postgres: PostgresConfig,

    pub metrics: MetricsConfig,

    pub squarespace: SquarespaceConfig,

    pub smtp: SmtpConfig,

    pub routing: RoutingConfig,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct MetricsConfig {
    pub enable: bool,

    pub listen_address: SocketAddr,
}

#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub host: String,

    pub port: u16,

    pub database: String,

    pub username: String,

    pub password: String,

    pub ssl_mode: PgSslMode,

    pub max_connections: u32,

    pub application_name: Option<String>,

    /// Bound on acquiring a connection and on every dedup query.
    pub operation_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SquarespaceConfig {
    /// Orders endpoint, e.g. `https://api.squarespace.com/1.0/commerce/orders/`.
    pub endpoint: http::Uri,

    pub api_key: String,

    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub transport: notification::smtp::Config,

    /// Address used as `From` on every notification.
    pub sender: String,
}

/// Recipient lists per product class.
#[derive(Clone, Debug, Default)]
pub struct RoutingConfig {
    /// Residential property appraisals inside Edmonton.
    pub in_edmonton: Vec<String>,

    /// Residential property appraisals outside Edmonton.
    pub outside_edmonton: Vec<String>,
}
