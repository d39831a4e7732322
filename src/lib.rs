//! # backend-trust
//!
//! Secure client configuration for secret-management operators that talk to
//! an external secret backend over TLS.
//!
//! ## Architecture
//!
//! ```text
//! BackendProviderSpec → SecureConfigBuilder → SecureClientConfig
//!                              ↓
//!                         CaResolver → CaSource (ConfigMap | Secret | Inline)
//!                                          ↓
//!                                     ObjectStore
//! ```
//!
//! - **CA resolution** ([`trust`]): fetches PEM certificates referenced by a
//!   CA provider from a namespaced object store.
//! - **Config building** ([`client`]): seeds the transport's root store from
//!   the resolved PEM and derives the SNI hostname from the server URL.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use backend_trust::{
//!     BackendProviderSpec, CaProviderSpec, Document, InMemoryObjectStore, ResolveContext,
//!     Result, SecureConfigBuilder,
//! };
//!
//! # async fn run(pem: &str) -> Result<()> {
//! let store = InMemoryObjectStore::new()
//!     .with_config_map("vault", "vault-ca", Document::new().with_field("ca.crt", pem));
//! let builder = SecureConfigBuilder::new(Arc::new(store));
//!
//! let spec = BackendProviderSpec::new("https://vault.example.com:8200")
//!     .with_ca_provider(CaProviderSpec::config_map("vault-ca", "ca.crt"));
//! let config = builder.build(&spec, "vault", &ResolveContext::background()).await?;
//! assert_eq!(config.server_name(), "vault.example.com");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod store;
pub mod trust;

// Re-export commonly used types and traits
pub use client::{EndpointWarning, SecureClientConfig, SecureConfigBuilder};
pub use config::{Config, ObservabilityConfig, TrustSettings};
pub use domain::{BackendProviderSpec, CaProviderSpec, CaSourceKind};
pub use errors::{AccessError, Error, Result, TrustError};
pub use observability::init_logging;
pub use store::{Document, FieldValue, InMemoryObjectStore, ObjectKey, ObjectKind, ObjectStore};
pub use trust::{CaResolver, ResolveContext, TrustMaterial, TrustStore};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
