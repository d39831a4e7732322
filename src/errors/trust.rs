use std::time::Duration;

use thiserror::Error;

use crate::domain::CaSourceKind;
use crate::store::{ObjectKind, StoreError};

/// Failures raised while resolving trust material for a backend connection.
///
/// Every variant is fatal to the config build that triggered it. Endpoint
/// problems that only affect SNI are reported through
/// [`EndpointWarning`](crate::client::EndpointWarning) instead.
#[derive(Debug, Error)]
pub enum TrustError {
    /// The referenced object does not exist in the object store.
    #[error("CA source {kind} {namespace}/{name} not found")]
    SourceNotFound { kind: ObjectKind, namespace: String, name: String },

    /// The object exists but has no usable value under the requested key.
    #[error("CA source {kind} {namespace}/{name} has no data for key '{key}'")]
    FieldMissing { kind: ObjectKind, namespace: String, name: String, key: String },

    /// The object store lookup itself failed.
    #[error("Failed to read CA source {kind} {namespace}/{name}: {source}")]
    SourceAccess {
        kind: ObjectKind,
        namespace: String,
        name: String,
        #[source]
        source: AccessError,
    },

    /// No source is registered for the requested kind.
    #[error("No CA source registered for type {kind}")]
    UnsupportedSource { kind: CaSourceKind },

    /// Inline CA data was requested but the provider carries none.
    #[error("Inline CA bundle requested but no caBundle is configured")]
    InlineBundleMissing,

    /// The resolved bytes do not contain a usable PEM certificate.
    #[error("CA material is not usable: {reason}")]
    InvalidMaterial { reason: String },
}

/// Reason an object store lookup could not complete.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The caller cancelled the operation.
    #[error("lookup cancelled")]
    Cancelled,

    /// The lookup did not finish within the configured timeout.
    #[error("lookup timed out after {}ms", .timeout.as_millis())]
    DeadlineExceeded { timeout: Duration },

    /// The store reported an error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TrustError {
    pub fn not_found(
        kind: ObjectKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::SourceNotFound { kind, namespace: namespace.into(), name: name.into() }
    }

    pub fn field_missing(
        kind: ObjectKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self::FieldMissing { kind, namespace: namespace.into(), name: name.into(), key: key.into() }
    }

    pub fn access(
        kind: ObjectKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        source: AccessError,
    ) -> Self {
        Self::SourceAccess { kind, namespace: namespace.into(), name: name.into(), source }
    }

    pub fn invalid_material(reason: impl Into<String>) -> Self {
        Self::InvalidMaterial { reason: reason.into() }
    }

    /// Whether the failure came from the caller cancelling the lookup.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::SourceAccess { source: AccessError::Cancelled, .. })
    }
}
