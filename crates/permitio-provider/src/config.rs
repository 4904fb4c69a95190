//! Provider block resolution.
//!
//! Environment variables take precedence over the provider block. Values are
//! read through a caller-supplied reader so tests never touch the process
//! environment.

use crate::common::known_string;
use permitio_client::{DEFAULT_API_URL, DEFAULT_TIMEOUT, PermitConfig};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_API_KEY: &str = "PERMITIO_API_KEY";
pub const ENV_API_URL: &str = "PERMITIO_API_URL";
pub const ENV_TIMEOUT: &str = "PERMITIO_TIMEOUT";
pub const ENV_DEBUG: &str = "PERMITIO_DEBUG";

/// The `provider "permitio"` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderModel {
    pub api_url: Value<String>,
    pub api_key: Value<String>,
    /// Seconds.
    pub timeout: Value<i64>,
}

pub fn provider_schema() -> Schema {
    Schema::new(attributes([
        (
            "api_url",
            Attribute::string()
                .optional()
                .with_description("The URL of Permit.io API"),
        ),
        (
            "api_key",
            Attribute::string()
                .optional()
                .sensitive()
                .with_description("The API key for Permit.io API (Required)"),
        ),
        (
            "timeout",
            Attribute::int64()
                .optional()
                .with_description("The timeout for Permit.io API calls, in seconds (default 10)"),
        ),
    ]))
}

/// Resolve client settings from the environment.
pub fn resolve_from_env(model: &ProviderModel) -> DiagResult<PermitConfig> {
    resolve_config(model, |key| std::env::var(key))
}

/// Resolve client settings from a custom variable reader.
pub fn resolve_config<F>(model: &ProviderModel, reader: F) -> DiagResult<PermitConfig>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut diags = Diagnostics::new();
    if model.api_url.is_unknown() {
        diags.add_attribute_error(
            AttributePath::root("api_url"),
            "Unknown Permit.io API URL",
            format!(
                "The provider cannot create the Permit.io API client as there is an unknown configuration value for the Permit.io API URL. \
                 Either target apply the source of the value first, set the value statically in the configuration, or use the {ENV_API_URL} environment variable."
            ),
        );
    }
    if model.api_key.is_unknown() {
        diags.add_attribute_error(
            AttributePath::root("api_key"),
            "Unknown Permit.io API Key",
            format!(
                "The provider cannot create the Permit.io API client as there is an unknown configuration value for the Permit.io API Key. \
                 Either target apply the source of the value first, set the value statically in the configuration, or use the {ENV_API_KEY} environment variable."
            ),
        );
    }
    if diags.has_error() {
        return Err(diags);
    }

    let debug = reader(ENV_DEBUG).is_ok_and(|v| v == "true");

    let Some(api_key) = reader(ENV_API_KEY)
        .ok()
        .or_else(|| known_string(&model.api_key))
        .filter(|key| !key.is_empty())
    else {
        return Err(Diagnostic::error(
            "Missing Permit.io API Key",
            format!(
                "The provider cannot create the Permit.io API client as there is a missing or empty value for the Permit.io API Key. \
                 Set the api_key value in the configuration or use the {ENV_API_KEY} environment variable."
            ),
        )
        .into());
    };

    let api_url = reader(ENV_API_URL)
        .ok()
        .or_else(|| known_string(&model.api_url))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let secs = match reader(ENV_TIMEOUT) {
        Ok(raw) => Some(raw.trim().parse::<i64>().map_err(|e| {
            debug!("Error parsing timeout from env var '{ENV_TIMEOUT}': {e}");
            Diagnostics::from(
                Diagnostic::error(
                    "Timeout is not a valid integer",
                    "The provider cannot create the Permit.io API client as the timeout value is not a valid integer.",
                )
                .with_attribute(AttributePath::root("timeout")),
            )
        })?),
        Err(_) => model.timeout.as_known().copied(),
    };
    let timeout = match secs {
        Some(secs) => u64::try_from(secs).map(Duration::from_secs).map_err(|_| {
            Diagnostics::from(
                Diagnostic::error(
                    "Invalid timeout",
                    format!("timeout must not be negative, got {secs}"),
                )
                .with_attribute(AttributePath::root("timeout")),
            )
        })?,
        None => DEFAULT_TIMEOUT,
    };

    let config = PermitConfig::new(api_key)
        .with_api_url(api_url)
        .with_timeout(timeout)
        .with_debug(debug);
    config.validate().map_err(|e| {
        Diagnostics::from(Diagnostic::error(
            "Invalid provider configuration",
            format!("The provider cannot create the Permit.io API client: {e}"),
        ))
    })?;

    info!(
        api_url = %config.api_url,
        timeout_secs = config.timeout.as_secs(),
        debug = config.debug,
        "Permit.io client configured"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    /// Create a reader closure from a HashMap (no global env mutation).
    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn block(api_url: Option<&str>, api_key: Option<&str>, timeout: Option<i64>) -> ProviderModel {
        ProviderModel {
            api_url: api_url.map(str::to_string).into(),
            api_key: api_key.map(str::to_string).into(),
            timeout: timeout.into(),
        }
    }

    fn first_summary(diags: &Diagnostics) -> String {
        diags.iter().next().map(|d| d.summary.clone()).unwrap_or_default()
    }

    #[test]
    fn test_defaults_from_block() {
        let config = resolve_config(&block(None, Some("block-key"), None), make_reader(HashMap::new())).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.debug);
    }

    #[test]
    fn test_env_overrides_block() {
        let reader = make_reader(HashMap::from([
            (ENV_API_KEY, "env-key"),
            (ENV_API_URL, "http://localhost:7766"),
            (ENV_TIMEOUT, "30"),
            (ENV_DEBUG, "true"),
        ]));
        let config = resolve_config(
            &block(Some("https://block.example.com"), Some("block-key"), Some(5)),
            reader,
        )
        .unwrap();

        assert_eq!(config.api_key.expose_secret(), "env-key");
        assert_eq!(config.api_url, "http://localhost:7766");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.debug);
    }

    #[test]
    fn test_block_timeout_used_without_env() {
        let config = resolve_config(
            &block(Some("https://block.example.com"), Some("k"), Some(5)),
            make_reader(HashMap::new()),
        )
        .unwrap();
        assert_eq!(config.api_url, "https://block.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_api_key() {
        let err = resolve_config(&block(None, None, None), make_reader(HashMap::new())).unwrap_err();
        assert_eq!(first_summary(&err), "Missing Permit.io API Key");
    }

    #[test]
    fn test_empty_api_key_is_missing() {
        let reader = make_reader(HashMap::from([(ENV_API_KEY, "")]));
        let err = resolve_config(&block(None, Some("block-key"), None), reader).unwrap_err();
        assert_eq!(first_summary(&err), "Missing Permit.io API Key");
    }

    #[test]
    fn test_invalid_timeout_env() {
        let reader = make_reader(HashMap::from([(ENV_API_KEY, "k"), (ENV_TIMEOUT, "soon")]));
        let err = resolve_config(&ProviderModel::default(), reader).unwrap_err();
        let d = err.iter().next().unwrap();
        assert_eq!(d.summary, "Timeout is not a valid integer");
        assert_eq!(d.attribute.as_ref().map(ToString::to_string).as_deref(), Some("timeout"));
    }

    #[test]
    fn test_unknown_values_rejected_first() {
        let model = ProviderModel {
            api_url: Value::Unknown,
            api_key: Value::Unknown,
            timeout: Value::Null,
        };
        let err = resolve_config(&model, make_reader(HashMap::from([(ENV_API_KEY, "k")]))).unwrap_err();
        let summaries: Vec<&str> = err.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, ["Unknown Permit.io API URL", "Unknown Permit.io API Key"]);
    }

    #[test]
    fn test_negative_timeout_rejected_from_either_source() {
        let reader = make_reader(HashMap::from([(ENV_API_KEY, "k"), (ENV_TIMEOUT, "-5")]));
        let err = resolve_config(&ProviderModel::default(), reader).unwrap_err();
        let d = err.iter().next().unwrap();
        assert_eq!(d.summary, "Invalid timeout");
        assert_eq!(d.detail, "timeout must not be negative, got -5");

        let err = resolve_config(&block(None, Some("k"), Some(-1)), make_reader(HashMap::new()))
            .unwrap_err();
        assert_eq!(first_summary(&err), "Invalid timeout");
    }

    #[test]
    fn test_debug_requires_exact_true() {
        let reader = make_reader(HashMap::from([(ENV_API_KEY, "k"), (ENV_DEBUG, "1")]));
        assert!(!resolve_config(&ProviderModel::default(), reader).unwrap().debug);
    }
}
