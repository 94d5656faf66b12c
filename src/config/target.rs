//! The validated upstream target.

use std::fmt;

use url::Url;

/// Error produced when the upstream endpoint cannot be used as a relay target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("upstream endpoint is not set")]
    Missing,
    #[error("upstream endpoint is not a valid URL: {0}")]
    Invalid(String),
    #[error("upstream endpoint scheme must be http or https, got {0:?}")]
    Scheme(String),
    #[error("upstream endpoint has no host")]
    NoHost,
    #[error("upstream endpoint must not carry a query or fragment")]
    QueryOrFragment,
}

/// Base URL every request is relayed to.
///
/// Built once at startup; request handling only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// Base URL without a trailing slash, so joining an inbound path never
    /// produces `//`.
    base: String,
    /// `host[:port]`, the port only when it is not the scheme default.
    host: String,
}

impl UpstreamTarget {
    /// Parse and validate an endpoint such as `https://api.example.com` or
    /// `http://10.0.0.5:8000/prefix`.
    pub fn parse(endpoint: &str) -> Result<Self, TargetError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(TargetError::Missing);
        }

        let url = Url::parse(endpoint).map_err(|e| TargetError::Invalid(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(TargetError::Scheme(other.to_string())),
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(TargetError::QueryOrFragment);
        }

        let host_str = url.host_str().ok_or(TargetError::NoHost)?;
        let host = match url.port() {
            Some(port) => format!("{}:{}", host_str, port),
            None => host_str.to_string(),
        };

        let base = url.as_str().trim_end_matches('/').to_string();

        Ok(Self { base, host })
    }

    /// Base URL without trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Value for the outbound `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Build the outbound URL: `{base}{path}` plus `?{query}` when present.
    pub fn join(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}{}?{}", self.base, path, q),
            None => format!("{}{}", self.base, path),
        }
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}
