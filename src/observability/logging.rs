//! # Structured Logging
//!
//! Subscriber setup and span helpers. PEM contents are never recorded; spans
//! and events carry object coordinates and byte counts only.

use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Create a tracing span for a single CA lookup.
///
/// ```rust,ignore
/// let span = resolve_span!(CaSourceKind::ConfigMap, "team-a", "vault-ca");
/// ```
#[macro_export]
macro_rules! resolve_span {
    ($kind:expr, $namespace:expr, $name:expr) => {
        tracing::debug_span!(
            "ca_resolve",
            kind = %$kind,
            namespace = %$namespace,
            name = %$name,
            lookup_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Create a tracing span for building a backend client config.
#[macro_export]
macro_rules! build_span {
    ($server:expr, $namespace:expr) => {
        tracing::info_span!(
            "secure_config_build",
            server = %$server,
            namespace = %$namespace,
            build_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.log_level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if config.json_logging { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", directives, e)))
}
