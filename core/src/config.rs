//! Client configuration.

use url::Url;

use crate::error::ApiError;

/// Environment variable read by [`Config::from_env`].
pub const ENDPOINT_ENV: &str = "MESSAGING_ENDPOINT";

/// Connection settings shared by every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    endpoint: String,
}

impl Config {
    /// Validate `endpoint` as an absolute http(s) URL. Surrounding
    /// whitespace and a trailing slash are dropped so paths can be appended
    /// directly.
    pub fn new(endpoint: &str) -> Result<Self, ApiError> {
        let endpoint = endpoint.trim();
        let invalid = |reason: String| ApiError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let parsed = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("endpoint must not carry a query or fragment".to_string()));
        }
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        let endpoint = std::env::var(ENDPOINT_ENV).map_err(|_| ApiError::InvalidEndpoint {
            endpoint: String::new(),
            reason: format!("{ENDPOINT_ENV} is not set"),
        })?;
        Self::new(&endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
