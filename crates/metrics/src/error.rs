use std::net::SocketAddr;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to create metrics registry, error: {source}"))]
    CreateRegistry { source: prometheus::Error },

    #[snafu(display("Failed to register metric `{name}`, error: {source}"))]
    RegisterCollector { name: String, source: prometheus::Error },

    #[snafu(display("Error occurs while binding metrics server on {listen_address}, error: {source}"))]
    BindMetricsServer { listen_address: SocketAddr, source: std::io::Error },

    #[snafu(display("Error occurs while serving metrics server, error: {source}"))]
    ServeMetricsServer { source: std::io::Error },
}
