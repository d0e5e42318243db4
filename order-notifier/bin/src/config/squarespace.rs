use std::time::Duration;

use order_notifier_core::DEFAULT_SQUARESPACE_ORDERS_ENDPOINT;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::config::{error, Error};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SquarespaceConfig {
    #[serde(default = "SquarespaceConfig::default_endpoint")]
    pub endpoint: String,

    /// Overridden by `SQSPACE_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "SquarespaceConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SquarespaceConfig {
    #[inline]
    pub fn default_endpoint() -> String { DEFAULT_SQUARESPACE_ORDERS_ENDPOINT.to_string() }

    #[inline]
    pub const fn default_timeout_secs() -> u64 { 30 }
}

impl Default for SquarespaceConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            api_key: String::new(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl TryFrom<SquarespaceConfig> for order_notifier_core::config::SquarespaceConfig {
    type Error = Error;

    fn try_from(
        SquarespaceConfig { endpoint, api_key, timeout_secs }: SquarespaceConfig,
    ) -> Result<Self, Self::Error> {
        let endpoint = endpoint
            .parse()
            .with_context(|_| error::ParseSquarespaceEndpointSnafu { value: endpoint.clone() })?;

        if api_key.is_empty() {
            tracing::warn!("Squarespace API key is empty, order lookups will be rejected upstream");
        }

        Ok(Self { endpoint, api_key, timeout: Duration::from_secs(timeout_secs) })
    }
}
