use std::net::SocketAddr;

use order_notifier_core::{DEFAULT_WEB_HOST, DEFAULT_WEB_PORT};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "WebConfig::default_listen_address")]
    pub listen_address: SocketAddr,
}

impl WebConfig {
    #[inline]
    pub const fn default_listen_address() -> SocketAddr {
        SocketAddr::new(DEFAULT_WEB_HOST, DEFAULT_WEB_PORT)
    }
}

impl Default for WebConfig {
    fn default() -> Self { Self { listen_address: Self::default_listen_address() } }
}

impl From<WebConfig> for order_notifier_core::config::WebConfig {
    fn from(WebConfig { listen_address }: WebConfig) -> Self { Self { listen_address } }
}
