//! Secure client configuration for a TLS-reachable secret backend.
//!
//! [`SecureConfigBuilder::build`] resolves the descriptor's CA provider into
//! a root store and derives the SNI hostname from the server URL. A CA that
//! cannot be resolved fails the build; a server URL without a usable host
//! only produces an [`EndpointWarning`].

mod builder;
mod config;
pub mod sni;

pub use builder::SecureConfigBuilder;
pub use config::{HttpClientConfig, SecureClientConfig, TlsClientSettings, Transport};
pub use sni::{derive_server_name, EndpointWarning, SniOutcome};
