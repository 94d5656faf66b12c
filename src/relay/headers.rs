//! Header policies for both directions of the relay.
//!
//! # Outbound (to upstream)
//! - Copy every inbound header as received
//! - Overwrite `Host` with the upstream host
//! - Drop `Connection` and `Upgrade-Insecure-Requests` (connection-local)
//!
//! # Inbound (to client)
//! - Copy every upstream header
//! - Overwrite the fixed security and CORS headers; upstream values are never merged

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::config::UpstreamTarget;
use crate::relay::error::RelayError;

/// `Upgrade-Insecure-Requests` has no constant in `http::header`.
pub const UPGRADE_INSECURE_REQUESTS: HeaderName =
    HeaderName::from_static("upgrade-insecure-requests");

/// Headers set on every relayed response, overriding the upstream.
pub const SECURITY_HEADERS: [(HeaderName, &str); 6] = [
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=31536000; includeSubDomains; preload",
    ),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; upgrade-insecure-requests;",
    ),
];

/// Derive the upstream request headers from the inbound ones.
pub fn outbound_headers(
    inbound: &HeaderMap,
    target: &UpstreamTarget,
) -> Result<HeaderMap, RelayError> {
    let mut headers = inbound.clone();

    let host = HeaderValue::from_str(target.host())
        .map_err(|e| RelayError::Internal(format!("invalid upstream host header: {}", e)))?;
    headers.insert(header::HOST, host);

    headers.remove(header::CONNECTION);
    headers.remove(UPGRADE_INSECURE_REQUESTS);

    Ok(headers)
}

/// Overwrite the fixed security and CORS headers on a response.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}
