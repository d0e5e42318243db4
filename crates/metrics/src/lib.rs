pub mod error;
mod server;
mod traits;

use snafu::ResultExt;

pub use self::{error::Error, server::start_metrics_server, traits::Metrics};

/// Prefix of every metric exposed by this registry.
pub const METRICS_NAMESPACE: &str = "order_notifier";

#[derive(Clone, Debug)]
pub struct DefaultMetrics {
    registry: prometheus::Registry,
}

impl DefaultMetrics {
    /// # Errors
    ///
    /// Returns an error if the namespaced registry cannot be created.
    pub fn new() -> Result<Self, Error> {
        let registry = prometheus::Registry::new_custom(Some(METRICS_NAMESPACE.to_string()), None)
            .context(error::CreateRegistrySnafu)?;

        Ok(Self { registry })
    }

    /// Registry that application collectors register into.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &prometheus::Registry { &self.registry }

    /// Registers `collector` under `name`, the name only used for error
    /// reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector with the same descriptors is already
    /// registered.
    pub fn register<C>(&self, name: &str, collector: C) -> Result<(), Error>
    where
        C: prometheus::core::Collector + 'static,
    {
        self.registry
            .register(Box::new(collector))
            .context(error::RegisterCollectorSnafu { name: name.to_string() })
    }
}

impl Metrics for DefaultMetrics {
    fn gather(&self) -> Vec<prometheus::proto::MetricFamily> { self.registry.gather() }
}

#[cfg(test)]
mod tests {
    use prometheus::{IntCounter, Opts};

    use crate::{DefaultMetrics, Metrics};

    #[test]
    fn test_new() { drop(DefaultMetrics::new().unwrap()); }

    #[test]
    fn test_registered_counter_is_namespaced() {
        let metrics = DefaultMetrics::new().unwrap();
        let counter = IntCounter::with_opts(Opts::new("probe_total", "probe")).unwrap();
        metrics.register("probe_total", counter.clone()).unwrap();
        counter.inc();

        let families = metrics.gather();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_name(), "order_notifier_probe_total");
    }

    #[test]
    fn test_register_twice_is_rejected() {
        let metrics = DefaultMetrics::new().unwrap();
        let counter = IntCounter::with_opts(Opts::new("probe_total", "probe")).unwrap();
        metrics.register("probe_total", counter.clone()).unwrap();

        assert!(metrics.register("probe_total", counter).is_err());
    }
}
