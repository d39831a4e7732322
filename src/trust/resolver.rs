use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, Instrument};

use super::sources::{CaSource, ConfigMapSource, InlineSource, SecretSource, TrustRequest};
use super::{ResolveContext, TrustMaterial};
use crate::domain::{CaProviderSpec, CaSourceKind};
use crate::errors::TrustError;
use crate::store::ObjectStore;

/// Dispatches CA provider descriptors to the source registered for their kind.
///
/// Holds no per-call state; one resolver can serve concurrent builds.
#[derive(Clone)]
pub struct CaResolver {
    sources: HashMap<CaSourceKind, Arc<dyn CaSource>>,
}

impl std::fmt::Debug for CaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaResolver").field("sources", &self.registered_sources()).finish()
    }
}

impl CaResolver {
    /// Resolver with the config map, secret and inline sources registered.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let mut resolver = Self::empty();
        resolver.register(Arc::new(ConfigMapSource::new(Arc::clone(&store))));
        resolver.register(Arc::new(SecretSource::new(store)));
        resolver.register(Arc::new(InlineSource));
        resolver
    }

    /// Resolver with no sources registered.
    pub fn empty() -> Self {
        Self { sources: HashMap::new() }
    }

    /// Register a source, replacing any existing source of the same kind.
    pub fn register(&mut self, source: Arc<dyn CaSource>) {
        let kind = source.kind();
        debug!(%kind, "Registering CA source");
        self.sources.insert(kind, source);
    }

    pub fn has_source(&self, kind: CaSourceKind) -> bool {
        self.sources.contains_key(&kind)
    }

    pub fn registered_sources(&self) -> Vec<CaSourceKind> {
        let mut kinds: Vec<_> = self.sources.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.as_str());
        kinds
    }

    /// Fetch the PEM bytes referenced by `provider`.
    ///
    /// `namespace` is used when the provider carries no namespace override.
    pub async fn resolve(
        &self,
        provider: &CaProviderSpec,
        namespace: &str,
        ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError> {
        self.resolve_request(&TrustRequest::new(provider, namespace), ctx).await
    }

    /// Same as [`resolve`](Self::resolve) with the full request, including
    /// any inline bundle.
    pub async fn resolve_request(
        &self,
        request: &TrustRequest<'_>,
        ctx: &ResolveContext,
    ) -> Result<TrustMaterial, TrustError> {
        let kind = request.provider.kind;
        let source = self
            .sources
            .get(&kind)
            .ok_or(TrustError::UnsupportedSource { kind })?;

        let namespace = request.provider.effective_namespace(request.namespace);
        let span = crate::resolve_span!(kind, namespace, request.provider.name);

        let material = source.fetch(request, ctx).instrument(span).await?;
        info!(
            %kind,
            namespace,
            name = %request.provider.name,
            key = %request.provider.key,
            bytes = material.len(),
            "Resolved CA material"
        );
        Ok(material)
    }
}
