//! CA resolution: turns a [`CaProviderSpec`](crate::domain::CaProviderSpec)
//! into PEM bytes and a root certificate store.
//!
//! Each source kind has its own [`CaSource`]; [`CaResolver`] picks one per
//! request. Lookups run against the caller's [`ResolveContext`] and are never
//! cached or retried.

mod context;
mod material;
mod resolver;
mod sources;

pub use context::ResolveContext;
pub use material::{TrustMaterial, TrustStore};
pub use resolver::CaResolver;
pub use sources::{CaSource, ConfigMapSource, InlineSource, SecretSource, TrustRequest};
