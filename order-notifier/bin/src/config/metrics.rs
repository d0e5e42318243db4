use std::net::SocketAddr;

use order_notifier_core::{DEFAULT_METRICS_HOST, DEFAULT_METRICS_PORT};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "MetricsConfig::default_enable")]
    pub enable: bool,

    #[serde(default = "MetricsConfig::default_listen_address")]
    pub listen_address: SocketAddr,
}

impl MetricsConfig {
    #[inline]
    pub const fn default_enable() -> bool { false }

    #[inline]
    pub const fn default_listen_address() -> SocketAddr {
        SocketAddr::new(DEFAULT_METRICS_HOST, DEFAULT_METRICS_PORT)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enable: Self::default_enable(), listen_address: Self::default_listen_address() }
    }
}

impl From<MetricsConfig> for order_notifier_core::config::MetricsConfig {
    fn from(MetricsConfig { enable, listen_address }: MetricsConfig) -> Self {
        Self { enable, listen_address }
    }
}
