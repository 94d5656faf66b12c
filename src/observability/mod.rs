//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay pipeline / http server
//!     → logging.rs (tracing events: relay errors, lifecycle)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Relay errors are logged with their kind and cause; clients only ever see
//!   the fixed 502 body
//! - Request ID flows through logs via the `x-request-id` header

pub mod logging;
pub mod metrics;
