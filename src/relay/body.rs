//! Body representation and the outbound body policy.
//!
//! # Policy
//! - `GET`/`HEAD`: never carry a body upstream
//! - `application/json` (with or without parameters): buffer, parse, re-serialize
//! - everything else: opaque stream, forwarded without buffering

use std::fmt;
use std::pin::Pin;

use axum::http::{header, HeaderMap, Method};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, TryStreamExt};

use crate::relay::error::RelayError;

/// Boxed error carried by body streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A body delivered chunk by chunk.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

/// Request or response body.
pub enum RelayBody {
    /// No body at all.
    Empty,
    /// Fully buffered bytes.
    Buffered(Bytes),
    /// Streamed bytes, read at most once.
    Stream(BodyStream),
}

impl RelayBody {
    /// Wrap any fallible byte stream.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        RelayBody::Stream(Box::pin(stream.map_err(|e| -> BoxError { e.into() })))
    }

    /// True only for [`RelayBody::Empty`] and empty buffered bodies.
    /// A stream is never considered empty since it has not been read.
    pub fn is_empty(&self) -> bool {
        match self {
            RelayBody::Empty => true,
            RelayBody::Buffered(bytes) => bytes.is_empty(),
            RelayBody::Stream(_) => false,
        }
    }

    /// Read the whole body into memory, failing once `limit` bytes are exceeded.
    pub async fn collect(self, limit: usize) -> Result<Bytes, RelayError> {
        match self {
            RelayBody::Empty => Ok(Bytes::new()),
            RelayBody::Buffered(bytes) if bytes.len() > limit => Err(too_large(limit)),
            RelayBody::Buffered(bytes) => Ok(bytes),
            RelayBody::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk.map_err(|e| RelayError::Body(e.to_string()))?;
                    if buf.len() + chunk.len() > limit {
                        return Err(too_large(limit));
                    }
                    buf.extend_from_slice(&chunk);
                }
                Ok(buf.freeze())
            }
        }
    }
}

impl fmt::Debug for RelayBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayBody::Empty => f.write_str("Empty"),
            RelayBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            RelayBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for RelayBody {
    fn from(bytes: Bytes) -> Self {
        RelayBody::Buffered(bytes)
    }
}

impl From<&'static str> for RelayBody {
    fn from(text: &'static str) -> Self {
        RelayBody::Buffered(Bytes::from_static(text.as_bytes()))
    }
}

fn too_large(limit: usize) -> RelayError {
    RelayError::Body(format!("body exceeds {} bytes", limit))
}

/// Whether the declared content type is JSON (`application/json`, optionally
/// with parameters such as `charset`).
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Whether the method may carry a body upstream.
pub fn allows_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Turn the inbound body into the outbound one.
///
/// `headers` are the already transformed outbound headers; `Content-Length`
/// is dropped whenever the forwarded bytes differ from the inbound ones.
pub async fn prepare_outbound(
    method: &Method,
    headers: &mut HeaderMap,
    body: RelayBody,
    limit: usize,
) -> Result<RelayBody, RelayError> {
    if !allows_body(method) {
        headers.remove(header::CONTENT_LENGTH);
        return Ok(RelayBody::Empty);
    }

    if is_json(headers) {
        let raw = body.collect(limit).await?;
        let value: serde_json::Value = serde_json::from_slice(&raw)?;
        let encoded = serde_json::to_vec(&value)?;
        headers.remove(header::CONTENT_LENGTH);
        return Ok(RelayBody::Buffered(Bytes::from(encoded)));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use futures_util::stream;

    fn json_headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&json_headers("application/json")));
        assert!(is_json(&json_headers("application/json; charset=utf-8")));
        assert!(is_json(&json_headers("Application/JSON")));
        assert!(!is_json(&json_headers("text/plain")));
        assert!(!is_json(&json_headers("application/x-www-form-urlencoded")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_get_and_head_drop_body() {
        for method in [Method::GET, Method::HEAD] {
            let mut headers = json_headers("application/json");
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("2"));
            let out = prepare_outbound(&method, &mut headers, "{}".into(), 1024)
                .await
                .unwrap();
            assert!(matches!(out, RelayBody::Empty));
            assert!(headers.get(header::CONTENT_LENGTH).is_none());
        }
    }

    #[tokio::test]
    async fn test_json_is_normalized() {
        let mut headers = json_headers("application/json");
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("40"));
        let inbound = RelayBody::from("{ \"b\" : [1, 2],\n  \"a\": \"x\" }");

        let out = prepare_outbound(&Method::POST, &mut headers, inbound, 1024)
            .await
            .unwrap();

        match out {
            RelayBody::Buffered(bytes) => assert_eq!(&bytes[..], br#"{"a":"x","b":[1,2]}"#),
            other => panic!("expected buffered body, got {:?}", other),
        }
        assert!(headers.get(header::CONTENT_LENGTH).is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_is_error() {
        let mut headers = json_headers("application/json");
        let err = prepare_outbound(&Method::POST, &mut headers, "{not json".into(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_empty_json_body_is_error() {
        let mut headers = json_headers("application/json");
        let err = prepare_outbound(&Method::PUT, &mut headers, RelayBody::Empty, 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_other_bodies_pass_through() {
        let mut headers = json_headers("application/octet-stream");
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"\x00\x01")), Ok(Bytes::from_static(b"\xff"))];
        let inbound = RelayBody::from_stream(stream::iter(chunks));

        let out = prepare_outbound(&Method::POST, &mut headers, inbound, 1024)
            .await
            .unwrap();
        assert!(matches!(out, RelayBody::Stream(_)));
        assert_eq!(&out.collect(1024).await.unwrap()[..], b"\x00\x01\xff");
    }

    #[tokio::test]
    async fn test_collect_enforces_limit() {
        let chunks: Vec<Result<Bytes, std::io::Error>> =
            vec![Ok(Bytes::from_static(b"12345")), Ok(Bytes::from_static(b"6789"))];
        let err = RelayBody::from_stream(stream::iter(chunks))
            .collect(8)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Body(_)));
    }

    #[tokio::test]
    async fn test_collect_surfaces_stream_error() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let err = RelayBody::from_stream(stream::iter(chunks))
            .collect(1024)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Body(_)));
    }
}
