//! Outbound response handling.
//!
//! Converts a `RelayResponse` into an axum response. Streaming bodies stay
//! streaming; nothing is buffered here.

use axum::body::Body;
use axum::response::Response;

use crate::relay::{RelayBody, RelayResponse};

/// Build the axum response for a relay result.
pub fn into_response(relayed: RelayResponse) -> Response {
    let body = match relayed.body {
        RelayBody::Empty => Body::empty(),
        RelayBody::Buffered(bytes) => Body::from(bytes),
        RelayBody::Stream(stream) => Body::from_stream(stream),
    };

    let mut response = Response::new(body);
    *response.status_mut() = relayed.status;
    *response.headers_mut() = relayed.headers;
    if let Some(reason) = relayed.reason {
        response.extensions_mut().insert(reason);
    }
    response
}
