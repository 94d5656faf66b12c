//! Plain request/response values crossing the relay boundary.
//!
//! None of these types depend on the HTTP server; `http::server` converts
//! between them and axum.

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use hyper::ext::ReasonPhrase;

use crate::relay::body::RelayBody;

/// Body of the fixed 502 response.
pub const RELAY_ERROR_MESSAGE: &str = "API relay error";

/// A request as received from the client.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    /// Only path and query are used.
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

impl InboundRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: RelayBody::Empty,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.append(name, HeaderValue::from_static(value));
        self
    }

    pub fn with_body(mut self, body: impl Into<RelayBody>) -> Self {
        self.body = body.into();
        self
    }
}

/// The request issued to the upstream.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    /// Absolute upstream URL.
    pub url: String,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

/// What the upstream answered.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Reason phrase from the status line when it differs from the canonical one.
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

/// The response handed back to the client.
#[derive(Debug)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub body: RelayBody,
}

impl RelayResponse {
    /// Status text sent to the client: the upstream's own phrase if it had
    /// one, otherwise the canonical reason.
    pub fn status_text(&self) -> &str {
        self.reason
            .as_ref()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("")
    }
}

/// The fixed response for every request-level failure. Carries no detail
/// about the cause.
pub fn error_response() -> RelayResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain;charset=UTF-8"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    RelayResponse {
        status: StatusCode::BAD_GATEWAY,
        reason: None,
        headers,
        body: RelayBody::from(RELAY_ERROR_MESSAGE),
    }
}
