//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, tracing span)
//!     → request.rs (axum Request → InboundRequest)
//!     → relay pipeline
//!     → response.rs (RelayResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestSpan, X_REQUEST_ID};
pub use server::{build_router, RelayServer};
