//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! RELAY_CONFIG (optional TOML file)
//!     → loader.rs (parse & deserialize)
//!     → env overrides (API_ENDPOINT, RELAY_BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → RelayConfig + UpstreamTarget (validated, immutable)
//!     → shared via Arc with the relay pipeline
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - An invalid upstream endpoint is fatal before the listener binds

pub mod loader;
pub mod schema;
pub mod target;
pub mod validation;

pub use loader::{load_from_env, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use target::{TargetError, UpstreamTarget};
