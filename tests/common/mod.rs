//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_relay::config::RelayConfig;
use api_relay::{RelayServer, Shutdown, UpstreamTarget};
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A mock upstream API that records every request it receives.
///
/// Paths:
/// - `/redirect` answers 302 to `/landing`
/// - `/bounce/{port}` answers 302 to `http://localhost:{port}/landing`
/// - `/conflict` answers 200 with its own values for the security headers
/// - `/status/{code}` answers with that status
/// - anything else answers 200 `ok` with `x-upstream: mock`
pub struct MockUpstream {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.seen.lock().unwrap().last().cloned().expect("upstream was not called")
    }
}

/// Start the mock upstream on an ephemeral port.
pub async fn start_mock_upstream() -> MockUpstream {
    let seen: Arc<Mutex<Vec<Captured>>> = Arc::default();
    let recorder = seen.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorder = recorder.clone();
        async move { mock_handler(recorder, request).await }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, seen }
}

async fn mock_handler(seen: Arc<Mutex<Vec<Captured>>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();

    seen.lock().unwrap().push(Captured {
        method: parts.method,
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body,
    });

    if path == "/redirect" {
        return (StatusCode::FOUND, [(header::LOCATION, "/landing")]).into_response();
    }

    if let Some(port) = path.strip_prefix("/bounce/") {
        let location = format!("http://localhost:{}/landing", port);
        return (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
    }

    if path == "/conflict" {
        return (
            StatusCode::OK,
            [
                (header::STRICT_TRANSPORT_SECURITY, "max-age=0"),
                (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "https://evil.example"),
                (header::CONTENT_SECURITY_POLICY, "default-src *"),
            ],
            "conflict",
        )
            .into_response();
    }

    if let Some(code) = path.strip_prefix("/status/") {
        let status = code
            .parse::<u16>()
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::OK);
        return (status, format!("status {}", status.as_u16())).into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain"), (header::HeaderName::from_static("x-upstream"), "mock")],
        "ok",
    )
        .into_response()
}

/// Start a relay pointed at `endpoint` on an ephemeral port.
pub async fn start_relay(endpoint: &str) -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.upstream.endpoint = endpoint.to_string();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.timeouts.connect_secs = 2;
    config.timeouts.upstream_secs = 5;

    let target = UpstreamTarget::parse(endpoint).unwrap();
    let server = RelayServer::new(config, target).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never follows redirects itself and ignores proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// An upstream that answers every connection with `response` verbatim.
pub async fn start_raw_upstream(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// Send `GET path` over a plain socket and return the response status line.
pub async fn raw_status_line(addr: SocketAddr, path: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8_lossy(&response);
    response.lines().next().unwrap_or_default().to_string()
}

async fn read_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
