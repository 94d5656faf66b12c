//! The relay pipeline.
//!
//! ```text
//! InboundRequest
//!     → preflight (OPTIONS → 204, done)
//!     → target URL + header policy + body policy → OutboundRequest
//!     → Upstream::send (single attempt)
//!     → security headers → RelayResponse
//!     (any Err → fixed 502)
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::config::UpstreamTarget;
use crate::observability::metrics;
use crate::relay::body::prepare_outbound;
use crate::relay::error::RelayError;
use crate::relay::headers::{apply_security_headers, outbound_headers};
use crate::relay::message::{error_response, InboundRequest, OutboundRequest, RelayResponse};
use crate::relay::preflight::preflight;
use crate::relay::upstream::{HttpUpstream, Upstream};

/// Relays requests to one fixed upstream.
///
/// Cheap to clone; clones share the target and the upstream client.
pub struct Relay<U = HttpUpstream> {
    target: Arc<UpstreamTarget>,
    upstream: Arc<U>,
    max_body_bytes: usize,
}

impl<U> Clone for Relay<U> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            upstream: self.upstream.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl<U: Upstream> Relay<U> {
    pub fn new(target: Arc<UpstreamTarget>, upstream: U, max_body_bytes: usize) -> Self {
        Self {
            target,
            upstream: Arc::new(upstream),
            max_body_bytes,
        }
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    /// Handle one inbound request. Never fails: errors become the fixed 502.
    pub async fn handle(&self, request: InboundRequest) -> RelayResponse {
        let start = Instant::now();
        let method = request.method.clone();

        if let Some(response) = preflight(&method) {
            metrics::record_request(method.as_str(), response.status.as_u16(), "preflight", start);
            return response;
        }

        match self.forward(request).await {
            Ok(response) => {
                metrics::record_request(method.as_str(), response.status.as_u16(), "relayed", start);
                response
            }
            Err(e) => {
                tracing::error!(
                    method = %method,
                    upstream = %self.target,
                    kind = e.kind(),
                    error = %e,
                    "Relay error"
                );
                metrics::record_upstream_error(e.kind());
                let response = error_response();
                metrics::record_request(method.as_str(), response.status.as_u16(), "error", start);
                response
            }
        }
    }

    async fn forward(&self, request: InboundRequest) -> Result<RelayResponse, RelayError> {
        let outbound = self.build_outbound(request).await?;

        tracing::info!(
            method = %outbound.method,
            url = %outbound.url,
            "Relaying request"
        );

        let upstream = self.upstream.send(outbound).await?;

        let mut headers = upstream.headers;
        apply_security_headers(&mut headers);

        Ok(RelayResponse {
            status: upstream.status,
            reason: upstream.reason,
            headers,
            body: upstream.body,
        })
    }

    /// Build the upstream request: target URL, header policy, body policy.
    pub async fn build_outbound(
        &self,
        request: InboundRequest,
    ) -> Result<OutboundRequest, RelayError> {
        let InboundRequest {
            method,
            uri,
            headers,
            body,
        } = request;

        let url = self.target.join(uri.path(), uri.query());
        let mut headers = outbound_headers(&headers, &self.target)?;
        let body = prepare_outbound(&method, &mut headers, body, self.max_body_bytes).await?;

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body,
        })
    }
}
