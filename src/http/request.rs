//! Inbound request handling.
//!
//! # Responsibilities
//! - Convert an axum request into a framework-free `InboundRequest`
//! - Attach a request ID to the tracing span (from `x-request-id` or a fresh UUID v4)
//!
//! The request ID is only used for logs; the inbound headers are relayed untouched.

use axum::body::{Body, HttpBody};
use axum::http::{HeaderMap, Request};
use tower_http::trace::MakeSpan;
use tracing::Span;
use uuid::Uuid;

use crate::relay::{InboundRequest, RelayBody};

/// Request ID header name.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID from the client, or a new UUID v4 when absent or not ASCII.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Span factory for `TraceLayer` that tags every request with its ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            request_id = %request_id(request.headers()),
            method = %request.method(),
            path = %request.uri().path()
        )
    }
}

/// Split an axum request into the relay's inbound value. The body stays a
/// stream; nothing is read here.
pub fn into_inbound(request: Request<Body>) -> InboundRequest {
    let (parts, body) = request.into_parts();

    let body = if body.is_end_stream() {
        RelayBody::Empty
    } else {
        RelayBody::from_stream(body.into_data_stream())
    };

    InboundRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    }
}
