//! HTTP-to-HTTPS API relay library.
//!
//! Forwards every inbound request to one fixed upstream API host and returns
//! the upstream response with security and CORS headers applied. `OPTIONS`
//! preflights are answered locally.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::{RelayConfig, UpstreamTarget};
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use relay::{Relay, RelayError};
