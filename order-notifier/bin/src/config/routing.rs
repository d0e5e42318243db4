use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RoutingConfig {
    /// Overridden by `IN_ED_RECP`.
    #[serde(default)]
    pub in_edmonton: Vec<String>,

    /// Overridden by `OUTSIDE_ED_RECP`.
    #[serde(default)]
    pub outside_edmonton: Vec<String>,
}

impl From<RoutingConfig> for order_notifier_core::config::RoutingConfig {
    fn from(RoutingConfig { in_edmonton, outside_edmonton }: RoutingConfig) -> Self {
        Self { in_edmonton, outside_edmonton }
    }
}

/// Splits a comma-separated recipient list, dropping blank entries.
pub fn parse_recipients(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|recipient| !recipient.is_empty())
        .map(ToString::to_string)
        .collect()
}
