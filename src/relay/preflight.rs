//! CORS preflight short-circuit.

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};

use crate::relay::body::RelayBody;
use crate::relay::message::RelayResponse;

const PREFLIGHT_HEADERS: [(header::HeaderName, &str); 5] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET, POST, PUT, DELETE, PATCH, OPTIONS",
    ),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type, Authorization, X-Requested-With",
    ),
    (header::ACCESS_CONTROL_MAX_AGE, "86400"),
    (header::CACHE_CONTROL, "public, max-age=86400"),
];

/// Answer `OPTIONS` locally with a 204 and the fixed CORS headers.
/// Any other method yields `None` and continues to the relay.
pub fn preflight(method: &Method) -> Option<RelayResponse> {
    if *method != Method::OPTIONS {
        return None;
    }

    let mut headers = HeaderMap::with_capacity(PREFLIGHT_HEADERS.len());
    for (name, value) in PREFLIGHT_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    Some(RelayResponse {
        status: StatusCode::NO_CONTENT,
        reason: None,
        headers,
        body: RelayBody::Empty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_is_answered() {
        let response = preflight(&Method::OPTIONS).unwrap();
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_empty());
        assert_eq!(response.headers.len(), 5);
        assert_eq!(
            response.headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, POST, PUT, DELETE, PATCH, OPTIONS"
        );
        assert_eq!(
            response.headers.get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=86400"
        );
    }

    #[test]
    fn test_other_methods_pass() {
        for method in [Method::GET, Method::POST, Method::DELETE, Method::PATCH] {
            assert!(preflight(&method).is_none());
        }
    }
}
