//! Read-only document store used to fetch CA material.
//!
//! The production store is a Kubernetes API client living outside this
//! crate; [`InMemoryObjectStore`] covers embedding and tests.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::trust::ResolveContext;

mod memory;

pub use memory::InMemoryObjectStore;

/// Kind of object holding CA material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    ConfigMap,
    Secret,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigMap => "ConfigMap",
            Self::Secret => "Secret",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single object in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub kind: ObjectKind,
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(kind: ObjectKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind, namespace: namespace.into(), name: name.into() }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A single value in a document's data mapping.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Binary(Vec<u8>),
}

impl FieldValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

// Values may hold key material; only sizes are printed.
impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text([{} bytes])", text.len()),
            Self::Binary(bytes) => write!(f, "Binary([{} bytes])", bytes.len()),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

/// Document returned by the store: a mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    data: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

/// Errors surfaced by an [`ObjectStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("object store unavailable: {message}")]
    Unavailable { message: String },

    /// The caller is not allowed to read the object.
    #[error("access to {key} forbidden: {message}")]
    Forbidden { key: String, message: String },

    /// Any other store-side failure.
    #[error("object store error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn forbidden(key: &ObjectKey, message: impl Into<String>) -> Self {
        Self::Forbidden { key: key.to_string(), message: message.into() }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend { message: message.into() }
    }
}

/// Read-only lookup of namespaced documents.
///
/// Implementations must be safe for concurrent reads. The context is passed
/// through so long-running lookups can observe cancellation themselves; the
/// resolver also races every lookup against it.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// Fetch a single object. `Ok(None)` means the object does not exist.
    async fn get(
        &self,
        ctx: &ResolveContext,
        key: &ObjectKey,
    ) -> std::result::Result<Option<Document>, StoreError>;
}
