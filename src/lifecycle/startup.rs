//! Startup orchestration.
//!
//! Order: config is already validated by the caller, then metrics, then the
//! upstream client, then the listener. Any failure is fatal; traffic is only
//! accepted once everything is ready.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{RelayConfig, UpstreamTarget};
use crate::http::RelayServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Error that prevents the relay from starting or keeps it from serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid {field}: {value:?}")]
    Address { field: &'static str, value: String },
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Start the relay and serve until a termination signal arrives.
pub async fn run(config: RelayConfig, target: UpstreamTarget) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = parse_addr("observability.metrics_address", &config.observability.metrics_address)?;
        metrics::init_metrics(addr)?;
    }

    tracing::info!(
        upstream = %target,
        upstream_host = %target.host(),
        connect_timeout_secs = config.timeouts.connect_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let addr = parse_addr("listener.bind_address", &config.listener.bind_address)?;
    let server = RelayServer::new(config, target)?;

    let listener = TcpListener::bind(addr).await.map_err(StartupError::Bind)?;
    let local_addr = listener.local_addr().map_err(StartupError::Bind)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await.map_err(StartupError::Serve)
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, StartupError> {
    value.parse().map_err(|_| StartupError::Address {
        field,
        value: value.to_string(),
    })
}
