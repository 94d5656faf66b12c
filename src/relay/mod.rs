//! Relay subsystem: everything between the inbound request and the
//! response handed back to the client.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → preflight.rs (OPTIONS short-circuit)
//!     → headers.rs (Host rewrite, connection-local headers dropped)
//!     → body.rs (GET/HEAD no body, JSON normalized, otherwise streamed)
//!     → upstream.rs (one request, redirects followed)
//!     → headers.rs (security + CORS headers forced)
//!     → RelayResponse
//! ```
//!
//! # Design Decisions
//! - No framework types cross this boundary except `http` primitives
//! - Failures are values (`RelayError`), mapped to one fixed 502 in `pipeline.rs`
//! - No retries, no caching, no shared mutable state

pub mod body;
pub mod error;
pub mod headers;
pub mod message;
pub mod pipeline;
pub mod preflight;
pub mod upstream;

pub use body::RelayBody;
pub use error::RelayError;
pub use message::{error_response, InboundRequest, OutboundRequest, RelayResponse, UpstreamResponse};
pub use pipeline::Relay;
pub use preflight::preflight;
pub use upstream::{HttpUpstream, Upstream};
