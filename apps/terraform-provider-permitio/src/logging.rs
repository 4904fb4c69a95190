//! Tracing subscriber setup. Logs go to stderr; stdout carries command output.

use tracing_subscriber::{EnvFilter, fmt};

pub const DEFAULT_FILTER: &str = "info,terraform_provider_permitio=debug";

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides `DEFAULT_FILTER`. Calling this twice is a no-op.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .flatten_event(true)
            .try_init()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(json, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }
}
