use std::sync::Arc;

use tracing::{debug, info, warn, Instrument};

use super::config::{HttpClientConfig, SecureClientConfig, Transport};
use super::sni::{derive_server_name, SniOutcome};
use crate::config::TrustSettings;
use crate::domain::BackendProviderSpec;
use crate::errors::Result;
use crate::store::ObjectStore;
use crate::trust::{CaResolver, ResolveContext, TrustRequest, TrustStore};

/// Builds [`SecureClientConfig`]s from backend descriptors.
///
/// Stateless between calls and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct SecureConfigBuilder {
    resolver: CaResolver,
    settings: TrustSettings,
}

impl SecureConfigBuilder {
    /// Builder reading CA objects from `store`, with default settings.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_resolver(CaResolver::new(store))
    }

    pub fn with_resolver(resolver: CaResolver) -> Self {
        Self { resolver, settings: TrustSettings::default() }
    }

    pub fn with_settings(mut self, settings: TrustSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn resolver(&self) -> &CaResolver {
        &self.resolver
    }

    pub fn settings(&self) -> &TrustSettings {
        &self.settings
    }

    /// Build a client configuration for `spec`.
    ///
    /// With a CA provider configured, its material must resolve or the build
    /// fails; the SNI hostname is then taken from `spec.server`, and an
    /// endpoint that yields no host only leaves SNI empty. Without a CA
    /// provider the transport keeps its defaults.
    ///
    /// `namespace` is where CA objects are looked up unless the provider
    /// overrides it; an empty value falls back to the configured default.
    pub async fn build(
        &self,
        spec: &BackendProviderSpec,
        namespace: &str,
        ctx: &ResolveContext,
    ) -> Result<SecureClientConfig> {
        let namespace =
            if namespace.is_empty() { self.settings.default_namespace.as_str() } else { namespace };
        let span = crate::build_span!(spec.server, namespace);
        self.build_inner(spec, namespace, ctx).instrument(span).await
    }

    async fn build_inner(
        &self,
        spec: &BackendProviderSpec,
        namespace: &str,
        ctx: &ResolveContext,
    ) -> Result<SecureClientConfig> {
        let mut transport = Transport::baseline(self.settings.request_timeout());
        let mut endpoint_warning = None;

        match &spec.ca_provider {
            Some(provider) => {
                let ctx = ctx.child().or_timeout(self.settings.lookup_timeout());
                let request = TrustRequest::new(provider, namespace)
                    .with_ca_bundle(spec.ca_bundle.as_deref());
                let material = self.resolver.resolve_request(&request, &ctx).await?;
                let store = TrustStore::from_material(material)?;
                debug!(anchors = store.len(), "Built trust store from CA provider");
                transport.tls.root_store = Some(Arc::new(store));

                match derive_server_name(&spec.server) {
                    SniOutcome::Host(host) => transport.tls.server_name = host,
                    SniOutcome::Skipped(warning) => {
                        warn!(%warning, "Could not derive TLS server name");
                        endpoint_warning = Some(warning);
                    }
                }
            }
            None if spec.ca_bundle.is_some() => {
                warn!("caBundle is set without a caProvider and is ignored");
            }
            None => {
                debug!("No CA provider configured, using default transport");
            }
        }

        let http = HttpClientConfig::from_transport(transport)?;
        info!(
            custom_roots = http.transport.tls.root_store.is_some(),
            server_name = %http.transport.tls.server_name,
            "Built secure client config"
        );

        Ok(SecureClientConfig { address: spec.server.clone(), http, endpoint_warning })
    }
}
