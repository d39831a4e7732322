use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;

use super::sni::EndpointWarning;
use crate::errors::{Error, Result};
use crate::trust::TrustStore;

/// TLS parameters applied to the backend transport.
#[derive(Debug, Clone, Default)]
pub struct TlsClientSettings {
    /// Explicit root store. `None` means the HTTP library's default roots.
    pub root_store: Option<Arc<TrustStore>>,
    /// SNI hostname derived from the backend URL. Empty means none.
    ///
    /// The `reqwest::Client` takes SNI from each request URL and does not read
    /// this field. Raw TLS connections apply it through
    /// [`SecureClientConfig::tls_server_name`].
    pub server_name: String,
}

/// Transport-level settings for the backend HTTP client.
#[derive(Debug, Clone)]
pub struct Transport {
    pub tls: TlsClientSettings,
    pub timeout: Duration,
}

impl Transport {
    /// Default transport: library roots, no SNI override.
    pub fn baseline(timeout: Duration) -> Self {
        Self { tls: TlsClientSettings::default(), timeout }
    }
}

/// HTTP client configuration: the transport settings and a client built
/// from them.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub transport: Transport,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    client: reqwest::Client,
}

impl HttpClientConfig {
    /// Assemble the HTTP client for `transport`.
    pub fn from_transport(transport: Transport) -> Result<Self> {
        let tls_config = match &transport.tls.root_store {
            Some(store) => Some(Arc::new(rustls_client_config(store)?)),
            None => None,
        };

        let mut builder = reqwest::Client::builder().timeout(transport.timeout);
        if let Some(config) = &tls_config {
            builder = builder.use_preconfigured_tls(rustls::ClientConfig::clone(config));
        }
        let client = builder
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { transport, tls_config, client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// The rustls config seeded with the resolved roots, if any.
    pub fn tls_config(&self) -> Option<Arc<rustls::ClientConfig>> {
        self.tls_config.clone()
    }
}

fn rustls_client_config(store: &TrustStore) -> Result<rustls::ClientConfig> {
    let provider = rustls::crypto::ring::default_provider();
    let config = rustls::ClientConfig::builder_with_provider(provider.into())
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::transport(format!("Invalid TLS protocol configuration: {}", e)))?
        .with_root_certificates(store.root_store())
        .with_no_client_auth();
    Ok(config)
}

/// Ready-to-use configuration for talking to a secret backend.
///
/// Each build produces an independent value; nothing is shared with the
/// builder or with other configs.
#[derive(Debug, Clone)]
pub struct SecureClientConfig {
    /// Backend endpoint as given in the descriptor.
    pub address: String,
    pub http: HttpClientConfig,
    /// Set when SNI could not be derived from `address`.
    pub endpoint_warning: Option<EndpointWarning>,
}

impl SecureClientConfig {
    pub fn http_client(&self) -> &reqwest::Client {
        self.http.client()
    }

    pub fn tls(&self) -> &TlsClientSettings {
        &self.http.transport.tls
    }

    pub fn trust_store(&self) -> Option<&TrustStore> {
        self.tls().root_store.as_deref()
    }

    /// SNI hostname override, empty when none applies.
    pub fn server_name(&self) -> &str {
        &self.tls().server_name
    }

    /// The SNI override as a rustls server name, for raw TLS connections.
    pub fn tls_server_name(&self) -> Option<ServerName<'static>> {
        if self.server_name().is_empty() {
            return None;
        }
        ServerName::try_from(self.server_name().to_string()).ok()
    }
}
