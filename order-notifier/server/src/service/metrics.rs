use notifier_metrics::DefaultMetrics;
use prometheus::{IntCounterVec, Opts};

/// Counters of the new-order pipeline.
#[derive(Clone, Debug)]
pub struct PipelineMetrics {
    orders: IntCounterVec,

    notifications: IntCounterVec,
}

impl PipelineMetrics {
    /// # Errors
    ///
    /// Returns an error if a counter definition is invalid.
    pub fn new() -> prometheus::Result<Self> {
        let orders = IntCounterVec::new(
            Opts::new("orders_total", "New-order requests by final outcome"),
            &["outcome"],
        )?;
        let notifications = IntCounterVec::new(
            Opts::new("notifications_total", "Purchase notifications by result"),
            &["result"],
        )?;

        Ok(Self { orders, notifications })
    }

    /// # Errors
    ///
    /// Returns an error if a counter is already registered.
    pub fn register(&self, metrics: &DefaultMetrics) -> Result<(), notifier_metrics::Error> {
        metrics.register("orders_total", self.orders.clone())?;
        metrics.register("notifications_total", self.notifications.clone())
    }

    pub fn observe_order(&self, outcome: &str) { self.orders.with_label_values(&[outcome]).inc(); }

    pub fn observe_notifications(&self, delivered: usize, failed: usize) {
        self.notifications.with_label_values(&["delivered"]).inc_by(delivered as u64);
        self.notifications.with_label_values(&["failed"]).inc_by(failed as u64);
    }

    #[cfg(test)]
    pub fn order_count(&self, outcome: &str) -> u64 {
        self.orders.with_label_values(&[outcome]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_counters() {
        let registry = DefaultMetrics::new().unwrap();
        let metrics = PipelineMetrics::new().unwrap();
        metrics.register(&registry).unwrap();

        metrics.observe_order("all_succeeded");
        metrics.observe_notifications(2, 1);

        let names: Vec<String> = registry
            .registry()
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"order_notifier_orders_total".to_string()));
        assert!(names.contains(&"order_notifier_notifications_total".to_string()));
        assert_eq!(metrics.order_count("all_succeeded"), 1);
    }
}
