//! The network side of the relay.
//!
//! [`Upstream`] is the seam between the pipeline and the network so the
//! pipeline can be exercised without sockets. [`HttpUpstream`] is the real
//! implementation on top of a pooled `reqwest::Client`.

use std::future::Future;
use std::time::Duration;

use axum::http::header;
use hyper::ext::ReasonPhrase;
use reqwest::{redirect, Client};

use crate::config::RelayConfig;
use crate::relay::body::RelayBody;
use crate::relay::error::RelayError;
use crate::relay::message::{OutboundRequest, UpstreamResponse};

/// Something that can carry one outbound request to the upstream.
///
/// Implementations must issue exactly one request per call and never retry.
pub trait Upstream: Send + Sync + 'static {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<UpstreamResponse, RelayError>> + Send;
}

/// HTTP(S) upstream client. Follows redirects; the response body is streamed.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    response_timeout: Duration,
}

impl HttpUpstream {
    /// Build the client from the timeout and redirect settings.
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(config.upstream.max_redirects))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            response_timeout: Duration::from_secs(config.timeouts.upstream_secs),
        })
    }
}

impl Upstream for HttpUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, RelayError> {
        // An explicit Host would survive redirects to other hosts. The client
        // derives it from the URL on every hop, which equals the target host
        // on the first one.
        let mut headers = request.headers;
        headers.remove(header::HOST);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(headers);

        builder = match request.body {
            RelayBody::Empty => builder,
            RelayBody::Buffered(bytes) => builder.body(bytes),
            RelayBody::Stream(stream) => builder.body(reqwest::Body::wrap_stream(stream)),
        };

        // Dropping this future (client went away) aborts the upstream request.
        let response = tokio::time::timeout(self.response_timeout, builder.send())
            .await
            .map_err(|_| RelayError::Timeout(self.response_timeout))??;

        let status = response.status();
        let reason = response.extensions().get::<ReasonPhrase>().cloned();
        let headers = response.headers().clone();
        let body = RelayBody::from_stream(response.bytes_stream());

        Ok(UpstreamResponse {
            status,
            reason,
            headers,
            body,
        })
    }
}
