//! Request-level relay failures.
//!
//! Every variant is converted into the same 502 response by
//! [`Relay::handle`](crate::relay::Relay::handle); the variant only feeds logs
//! and metrics.

use std::time::Duration;

/// A failure that aborts one relay invocation.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Declared JSON body did not parse.
    #[error("invalid JSON request body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Inbound body could not be read or exceeded the buffering limit.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// Network or protocol failure talking to the upstream.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Upstream response headers did not arrive in time.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Anything else that went wrong while building the outbound request.
    #[error("internal relay error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Static label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidJson(_) => "invalid_json",
            RelayError::Body(_) => "body",
            RelayError::Upstream(e) if e.is_timeout() => "timeout",
            RelayError::Upstream(e) if e.is_connect() => "connect",
            RelayError::Upstream(_) => "upstream",
            RelayError::Timeout(_) => "timeout",
            RelayError::Internal(_) => "internal",
        }
    }
}
