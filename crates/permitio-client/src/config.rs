//! Client configuration.

use crate::error::{PermitError, PermitResult};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default Permit.io API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.permit.io";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a [`PermitClient`](crate::PermitClient).
#[derive(Clone)]
pub struct PermitConfig {
    /// Base URL of the API, without a trailing `/v2`.
    pub api_url: String,

    /// Environment-scoped API key, sent as a bearer token.
    pub api_key: SecretString,

    /// Timeout applied to every request.
    pub timeout: Duration,

    /// Log request and response bodies at debug level.
    pub debug: bool,
}

impl PermitConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: SecretString::from(api_key.into()),
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check that the settings can produce a working client.
    pub fn validate(&self) -> PermitResult<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(PermitError::InvalidConfiguration(
                "API key must not be empty".to_string(),
            ));
        }

        let url = Url::parse(&self.api_url).map_err(|e| {
            PermitError::InvalidConfiguration(format!("invalid API URL '{}': {e}", self.api_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PermitError::InvalidConfiguration(format!(
                "API URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(PermitError::InvalidConfiguration(format!(
                "API URL '{}' cannot be used as a base URL",
                self.api_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(PermitError::InvalidConfiguration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for PermitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermitConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PermitConfig::new("permit_key_abc");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = PermitConfig::new("permit_key_abc");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("permit_key_abc"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(PermitConfig::new("  ").validate().is_err());
        assert!(
            PermitConfig::new("k")
                .with_api_url("not a url")
                .validate()
                .is_err()
        );
        assert!(
            PermitConfig::new("k")
                .with_api_url("ftp://api.permit.io")
                .validate()
                .is_err()
        );
        assert!(
            PermitConfig::new("k")
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
