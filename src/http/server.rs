//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all relay handler
//! - Wire up middleware (request-scoped tracing spans)
//! - Bind server to listener and shut down gracefully
//! - Convert between axum types and the relay's plain values

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{RelayConfig, UpstreamTarget};
use crate::http::request::{into_inbound, RequestSpan};
use crate::http::response::into_response;
use crate::relay::{HttpUpstream, Relay, Upstream};

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a server relaying to `target` over HTTP(S).
    pub fn new(config: RelayConfig, target: UpstreamTarget) -> Result<Self, reqwest::Error> {
        let upstream = HttpUpstream::new(&config)?;
        let relay = Relay::new(Arc::new(target), upstream, config.limits.max_body_bytes);
        Ok(Self::with_relay(config, relay))
    }

    /// Create a server around an already built relay.
    pub fn with_relay<U: Upstream>(config: RelayConfig, relay: Relay<U>) -> Self {
        let router = build_router(relay);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires. In-flight requests are drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.endpoint,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Build the router: every method on every path goes to the relay.
pub fn build_router<U: Upstream>(relay: Relay<U>) -> Router {
    Router::new()
        .route("/", any(relay_handler::<U>))
        .route("/{*path}", any(relay_handler::<U>))
        .with_state(relay)
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
}

async fn relay_handler<U: Upstream>(
    State(relay): State<Relay<U>>,
    request: Request<Body>,
) -> Response {
    let inbound = into_inbound(request);
    into_response(relay.handle(inbound).await)
}
