//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. All problems are
//! reported at once, not just the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;
use crate::config::target::{TargetError, UpstreamTarget};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `upstream.endpoint` is unusable.
    Upstream(TargetError),
    /// A socket address field does not parse.
    InvalidAddress { field: &'static str, value: String },
    /// A numeric field must be greater than zero.
    Zero { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Upstream(e) => write!(f, "upstream.endpoint: {}", e),
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{}: invalid socket address {:?}", field, value)
            }
            ValidationError::Zero { field } => write!(f, "{}: must be greater than 0", field),
        }
    }
}

/// Validate the whole config. On success the parsed upstream target is returned
/// so callers do not parse the endpoint twice.
pub fn validate_config(config: &RelayConfig) -> Result<UpstreamTarget, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let target = match UpstreamTarget::parse(&config.upstream.endpoint) {
        Ok(t) => Some(t),
        Err(e) => {
            errors.push(ValidationError::Upstream(e));
            None
        }
    };

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.connect_secs" });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.upstream_secs" });
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_body_bytes" });
    }

    match target {
        Some(t) if errors.is_empty() => Ok(t),
        _ => Err(errors),
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
