//! # Configuration Settings
//!
//! Tunables for trust resolution and the backend HTTP client.

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Settings applied to every secure config build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TrustSettings {
    /// Upper bound on a single CA object lookup, used when the caller's
    /// context has no timeout of its own
    #[validate(range(
        min = 1,
        max = 300,
        message = "Lookup timeout must be between 1 and 300 seconds"
    ))]
    pub lookup_timeout_seconds: u64,

    /// Request timeout for the backend HTTP client
    #[validate(range(
        min = 1,
        max = 600,
        message = "Request timeout must be between 1 and 600 seconds"
    ))]
    pub request_timeout_seconds: u64,

    /// Namespace used when the caller passes an empty one
    #[validate(length(min = 1, message = "Default namespace cannot be empty"))]
    pub default_namespace: String,
}

impl Default for TrustSettings {
    fn default() -> Self {
        Self {
            lookup_timeout_seconds: 10,
            request_timeout_seconds: 60,
            default_namespace: "default".to_string(),
        }
    }
}

impl TrustSettings {
    /// Load settings from `BACKEND_TRUST_*` environment variables.
    ///
    /// Unparseable values fall back to their defaults; the result is validated.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let lookup_timeout_seconds = std::env::var("BACKEND_TRUST_LOOKUP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.lookup_timeout_seconds);

        let request_timeout_seconds = std::env::var("BACKEND_TRUST_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.request_timeout_seconds);

        let default_namespace = std::env::var("BACKEND_TRUST_DEFAULT_NAMESPACE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.default_namespace);

        let settings =
            Self { lookup_timeout_seconds, request_timeout_seconds, default_namespace };
        settings.validate()?;
        Ok(settings)
    }

    /// Get lookup timeout as Duration
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Result<Self> {
        let log_level = std::env::var("BACKEND_TRUST_LOG_LEVEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let json_logging = std::env::var("BACKEND_TRUST_JSON_LOGGING")
            .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let config = Self { log_level, json_logging };
        config.validate()?;
        Ok(config)
    }
}
