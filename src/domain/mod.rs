//! Domain types for backend connection descriptors.

pub mod provider;

pub use provider::{BackendProviderSpec, CaProviderSpec, CaSourceKind};
