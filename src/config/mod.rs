//! # Configuration Management
//!
//! Settings for trust resolution and logging, loaded from the environment.

pub mod settings;

pub use settings::{ObservabilityConfig, TrustSettings};

/// Combined configuration for embedding the builder in an operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub trust: TrustSettings,
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Ok(Self {
            trust: TrustSettings::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        })
    }
}
