//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::target::UpstreamTarget;
use crate::config::validation::{validate_config, ValidationError};

/// Path of an optional TOML config file.
pub const ENV_CONFIG_PATH: &str = "RELAY_CONFIG";
/// Upstream base URL; overrides `upstream.endpoint`.
pub const ENV_API_ENDPOINT: &str = "API_ENDPOINT";
/// Overrides `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file without validating it.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse TOML text into a config without validating it.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides using `lookup` as the variable source.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup(ENV_API_ENDPOINT).filter(|v| !v.trim().is_empty()) {
        config.upstream.endpoint = endpoint;
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS).filter(|v| !v.trim().is_empty()) {
        config.listener.bind_address = addr;
    }
}

/// Resolve the full startup configuration: optional file, then environment
/// overrides, then validation.
pub fn load_with<F>(lookup: F) -> Result<(RelayConfig, UpstreamTarget), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(ENV_CONFIG_PATH) {
        Some(path) => load_config(Path::new(&path))?,
        None => RelayConfig::default(),
    };
    apply_env_overrides(&mut config, &lookup);

    let target = validate_config(&config).map_err(ConfigError::Validation)?;
    Ok((config, target))
}

/// [`load_with`] backed by the process environment.
pub fn load_from_env() -> Result<(RelayConfig, UpstreamTarget), ConfigError> {
    load_with(|key| std::env::var(key).ok())
}
