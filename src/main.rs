//! API relay
//!
//! Relays every inbound request to one configured upstream API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http server ─▶ preflight? ──yes──▶ 204     │
//!                         │                     │ no                     │
//!                         │                     ▼                        │
//!                         │   header policy + body policy                │
//!                         │                     │                        │
//!                         │                     ▼                        │      Upstream
//!                         │             upstream client ─────────────────┼────▶ API
//!                         │                     │                        │
//!     Client Response     │                     ▼                        │
//!     ◀───────────────────┼── security headers (or fixed 502)            │
//!                         └──────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! - `API_ENDPOINT`: upstream base URL (required unless set in the file)
//! - `RELAY_CONFIG`: optional TOML config file
//! - `RELAY_BIND_ADDRESS`: listener address override
//! - `RUST_LOG`: log filter override

use std::process::ExitCode;

use api_relay::config;
use api_relay::lifecycle;
use api_relay::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let (config, target) = match config::load_from_env() {
        Ok(loaded) => loaded,
        Err(e) => {
            // Logging is configured from the config, so it is not up yet.
            eprintln!("api-relay: configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("api-relay v{} starting", env!("CARGO_PKG_VERSION"));

    match lifecycle::run(config, target).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Relay failed");
            ExitCode::FAILURE
        }
    }
}
