use std::collections::HashMap;

use order_notifier_core::config::RoutingConfig;

/// Residential property appraisal in Edmonton.
pub const IN_EDMONTON_SKU: &str = "SQ5929745";

/// Residential property appraisal outside Edmonton.
pub const OUTSIDE_EDMONTON_SKU: &str = "SQ8618609";

/// Fixed SKU to recipients table.
#[derive(Clone, Debug, Default)]
pub struct RecipientRouter {
    routes: HashMap<&'static str, Vec<String>>,
}

impl RecipientRouter {
    /// Recipients for `sku` in configured order, `None` when the SKU is
    /// unroutable.
    #[must_use]
    pub fn recipients_for(&self, sku: &str) -> Option<&[String]> {
        self.routes.get(sku).map(Vec::as_slice)
    }
}

impl From<RoutingConfig> for RecipientRouter {
    fn from(RoutingConfig { in_edmonton, outside_edmonton }: RoutingConfig) -> Self {
        let routes = [(IN_EDMONTON_SKU, in_edmonton), (OUTSIDE_EDMONTON_SKU, outside_edmonton)]
            .into_iter()
            .map(|(sku, recipients)| {
                let recipients = recipients
                    .into_iter()
                    .map(|recipient| recipient.trim().to_string())
                    .filter(|recipient| !recipient.is_empty())
                    .collect::<Vec<_>>();
                (sku, recipients)
            })
            .filter(|(sku, recipients)| {
                if recipients.is_empty() {
                    tracing::warn!(sku, "No recipients configured, purchases will be unroutable");
                }
                !recipients.is_empty()
            })
            .collect();

        Self { routes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> RecipientRouter {
        RecipientRouter::from(RoutingConfig {
            in_edmonton: vec!["edmonton@example.com".to_string()],
            outside_edmonton: vec!["rural@example.com".to_string(), "backup@example.com".to_string()],
        })
    }

    #[test]
    fn test_known_skus_are_routed() {
        let router = router();

        assert_eq!(router.recipients_for(IN_EDMONTON_SKU), Some(&["edmonton@example.com".to_string()][..]));
        assert_eq!(
            router.recipients_for(OUTSIDE_EDMONTON_SKU).map(<[String]>::len),
            Some(2)
        );
    }

    #[test]
    fn test_unknown_sku_is_unroutable() {
        assert!(router().recipients_for("UNKNOWN-SKU").is_none());
        assert!(router().recipients_for("sq5929745").is_none());
    }

    #[test]
    fn test_empty_recipient_list_is_unroutable() {
        let router = RecipientRouter::from(RoutingConfig {
            in_edmonton: vec![" ".to_string()],
            outside_edmonton: vec!["rural@example.com".to_string()],
        });

        assert!(router.recipients_for(IN_EDMONTON_SKU).is_none());
        assert!(router.recipients_for(OUTSIDE_EDMONTON_SKU).is_some());
    }
}
