//! One [`CaSource`] implementation per [`CaSourceKind`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ResolveContext, TrustMaterial};
use crate::domain::{CaProviderSpec, CaSourceKind};
use crate::errors::{AccessError, TrustError};
use crate::store::{Document, ObjectKey, ObjectStore};

/// Inputs to a single trust resolution.
#[derive(Debug, Clone, Copy)]
pub struct TrustRequest<'a> {
    pub provider: &'a CaProviderSpec,
    /// Used when the provider has no namespace override.
    pub namespace: &'a str,
    /// Inline PEM from the backend descriptor, consumed by [`InlineSource`].
    pub ca_bundle: Option<&'a [u8]>,
}

impl<'a> TrustRequest<'a> {
    pub fn new(provider: &'a CaProviderSpec, namespace: &'a str) -> Self {
        Self { provider, namespace, ca_bundle: None }
    }

    pub fn with_ca_bundle(mut self, ca_bundle: Option<&'a [u8]>) -> Self {
        self.ca_bundle = ca_bundle;
        self
    }
}

/// A pluggable origin of CA material.
#[async_trait]
pub trait CaSource: Send + Sync + fmt::Debug {
    /// The descriptor kind this source serves.
    fn kind(&self) -> CaSourceKind;

    /// Fetch PEM bytes for the request. Never retries.
    async fn fetch(
        &self,
        request: &TrustRequest<'_>,
        ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError>;
}

/// Reads CA certificates from a config map entry.
#[derive(Debug, Clone)]
pub struct ConfigMapSource {
    store: Arc<dyn ObjectStore>,
}

impl ConfigMapSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CaSource for ConfigMapSource {
    fn kind(&self) -> CaSourceKind {
        CaSourceKind::ConfigMap
    }

    async fn fetch(
        &self,
        request: &TrustRequest<'_>,
        ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError> {
        fetch_field(self.store.as_ref(), self.kind(), request, ctx).await
    }
}

/// Reads CA certificates from a secret entry.
#[derive(Debug, Clone)]
pub struct SecretSource {
    store: Arc<dyn ObjectStore>,
}

impl SecretSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CaSource for SecretSource {
    fn kind(&self) -> CaSourceKind {
        CaSourceKind::Secret
    }

    async fn fetch(
        &self,
        request: &TrustRequest<'_>,
        ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError> {
        fetch_field(self.store.as_ref(), self.kind(), request, ctx).await
    }
}

/// Serves the `caBundle` carried on the backend descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSource;

#[async_trait]
impl CaSource for InlineSource {
    fn kind(&self) -> CaSourceKind {
        CaSourceKind::Inline
    }

    async fn fetch(
        &self,
        request: &TrustRequest<'_>,
        _ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError> {
        match request.ca_bundle {
            Some(bundle) if !bundle.is_empty() => Ok(TrustMaterial::new(bundle.to_vec())),
            _ => Err(TrustError::InlineBundleMissing),
        }
    }
}

async fn fetch_field(
    store: &dyn ObjectStore,
    source: CaSourceKind,
    request: &TrustRequest<'_>,
    ctx: &ResolveContext,
) -> Result<TrustMaterial, TrustError> {
    let kind = source.object_kind().ok_or(TrustError::UnsupportedSource { kind: source })?;
    let provider = request.provider;
    let namespace = provider.effective_namespace(request.namespace);
    let name = provider.name.as_str();
    let field = provider.key.as_str();

    if name.is_empty() {
        debug!(%kind, namespace, "CA provider has no object name");
        return Err(TrustError::not_found(kind, namespace, name));
    }
    if field.is_empty() {
        debug!(%kind, namespace, name, "CA provider has no key");
        return Err(TrustError::field_missing(kind, namespace, name, field));
    }

    let key = ObjectKey::new(kind, namespace, name);
    let document = lookup(store, ctx, &key)
        .await
        .map_err(|source| TrustError::access(kind, namespace, name, source))?
        .ok_or_else(|| TrustError::not_found(kind, namespace, name))?;

    match document.field(field) {
        Some(value) if !value.is_empty() => Ok(TrustMaterial::new(value.as_bytes().to_vec())),
        _ => {
            debug!(
                %kind,
                namespace,
                name,
                key = field,
                available = ?document.keys().collect::<Vec<_>>(),
                "CA key missing or empty"
            );
            Err(TrustError::field_missing(kind, namespace, name, field))
        }
    }
}

/// Single store lookup raced against cancellation and the context timeout.
async fn lookup(
    store: &dyn ObjectStore,
    ctx: &ResolveContext,
    key: &ObjectKey,
) -> Result<Option<Document>, AccessError> {
    if ctx.is_cancelled() {
        return Err(AccessError::Cancelled);
    }

    let bounded = async {
        let get = store.get(ctx, key);
        match ctx.timeout() {
            Some(timeout) => match tokio::time::timeout(timeout, get).await {
                Ok(result) => result.map_err(AccessError::from),
                Err(_) => Err(AccessError::DeadlineExceeded { timeout }),
            },
            None => get.await.map_err(AccessError::from),
        }
    };

    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(AccessError::Cancelled),
        result = bounded => result,
    }
}
