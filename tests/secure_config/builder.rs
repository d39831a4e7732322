use std::sync::Arc;

use backend_trust::{
    BackendProviderSpec, CaProviderSpec, Document, EndpointWarning, Error, InMemoryObjectStore,
    ObjectKind, ResolveContext, TrustError,
};

use super::support::{
    builder_for, generate_ca_pem, store_with_ca_config_map, CountingStore, CA_KEY, CA_OBJECT,
    TEST_CA_CERT, TEST_NAMESPACE,
};

fn background() -> ResolveContext {
    ResolveContext::background()
}

fn spec_with_config_map(server: &str) -> BackendProviderSpec {
    BackendProviderSpec::new(server).with_ca_provider(CaProviderSpec::config_map(CA_OBJECT, CA_KEY))
}

#[tokio::test]
async fn server_name_set_from_server_url() {
    let cases = [
        ("HTTPS URL with hostname", "https://vault.example.com", "vault.example.com"),
        ("HTTPS URL with hostname and port", "https://vault.example.com:8200", "vault.example.com"),
        ("HTTP URL", "http://vault.example.com", "vault.example.com"),
        ("IP address", "https://192.168.1.100:8200", "192.168.1.100"),
    ];

    for (name, server, expected) in cases {
        let builder = builder_for(store_with_ca_config_map(TEST_CA_CERT));
        let config = builder
            .build(&spec_with_config_map(server), TEST_NAMESPACE, &ResolveContext::background())
            .await
            .unwrap_or_else(|e| panic!("{name}: build failed: {e}"));

        assert_eq!(config.server_name(), expected, "{name}");
        assert!(config.trust_store().is_some(), "{name}: root store should be set");
        assert!(config.endpoint_warning.is_none(), "{name}");
        assert!(config.http.tls_config().is_some(), "{name}");
    }
}

#[tokio::test]
async fn no_ca_provider_keeps_default_transport() {
    let store = CountingStore::new(store_with_ca_config_map(TEST_CA_CERT));
    let store = Arc::new(store);
    let builder = backend_trust::SecureConfigBuilder::new(store.clone());

    for server in ["https://vault.example.com", "://invalid-url", ""] {
        let config = builder
            .build(&BackendProviderSpec::new(server), TEST_NAMESPACE, &ResolveContext::background())
            .await
            .expect("build without CA provider");

        assert!(config.trust_store().is_none());
        assert!(config.server_name().is_empty());
        assert!(config.endpoint_warning.is_none());
        assert!(config.http.tls_config().is_none());
    }
    assert_eq!(store.calls(), 0, "no lookup without a CA provider");
}

#[tokio::test]
async fn invalid_url_still_builds_with_roots() {
    let builder = builder_for(store_with_ca_config_map(TEST_CA_CERT));
    let config = builder
        .build(&spec_with_config_map("://invalid-url"), TEST_NAMESPACE, &background())
        .await
        .expect("invalid URL must not fail the build");

    assert!(config.trust_store().is_some(), "root store should still be set");
    assert!(config.server_name().is_empty());
    assert!(config.tls_server_name().is_none());
    assert!(matches!(config.endpoint_warning, Some(EndpointWarning::Unparseable { .. })));
}

#[tokio::test]
async fn url_without_host_leaves_sni_empty() {
    let builder = builder_for(store_with_ca_config_map(TEST_CA_CERT));
    let config = builder
        .build(&spec_with_config_map("unix:/var/run/vault.sock"), TEST_NAMESPACE, &background())
        .await
        .unwrap();

    assert!(config.server_name().is_empty());
    assert!(matches!(config.endpoint_warning, Some(EndpointWarning::MissingHost { .. })));
}

#[tokio::test]
async fn missing_object_fails_build() {
    let builder = builder_for(InMemoryObjectStore::new());
    let err = builder
        .build(&spec_with_config_map("https://vault:8200"), TEST_NAMESPACE, &background())
        .await
        .expect_err("missing CA object must fail");

    match err {
        Error::Trust(TrustError::SourceNotFound { kind, namespace, name }) => {
            assert_eq!(kind, ObjectKind::ConfigMap);
            assert_eq!(namespace, TEST_NAMESPACE);
            assert_eq!(name, CA_OBJECT);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_field_fails_build() {
    let store = InMemoryObjectStore::new().with_config_map(
        TEST_NAMESPACE,
        CA_OBJECT,
        Document::new().with_field("tls.crt", TEST_CA_CERT),
    );
    let err = builder_for(store)
        .build(&spec_with_config_map("https://vault:8200"), TEST_NAMESPACE, &background())
        .await
        .expect_err("missing CA key must fail");

    assert!(matches!(err, Error::Trust(TrustError::FieldMissing { ref key, .. }) if key == CA_KEY));
}

#[tokio::test]
async fn secret_source_with_namespace_override() {
    let pem = generate_ca_pem("Vault Secret CA").expect("generate CA");
    let store = InMemoryObjectStore::new().with_secret(
        "vault-system",
        "vault-tls",
        Document::new().with_field("ca.pem", pem.clone().into_bytes()),
    );
    let spec = BackendProviderSpec::new("https://vault.vault-system.svc:8200").with_ca_provider(
        CaProviderSpec::secret("vault-tls", "ca.pem").with_namespace("vault-system"),
    );

    let config = builder_for(store)
        .build(&spec, TEST_NAMESPACE, &ResolveContext::background())
        .await
        .expect("secret CA source");

    assert_eq!(config.server_name(), "vault.vault-system.svc");
    assert_eq!(config.trust_store().unwrap().pem(), pem.as_bytes());
}

#[tokio::test]
async fn pem_bytes_reach_trust_store_unchanged() {
    let bundle = format!(
        "{}\n{}",
        generate_ca_pem("Root One").unwrap(),
        generate_ca_pem("Root Two").unwrap()
    );
    let builder = builder_for(store_with_ca_config_map(&bundle));
    let config = builder
        .build(&spec_with_config_map("https://vault:8200"), TEST_NAMESPACE, &background())
        .await
        .unwrap();

    let store = config.trust_store().expect("trust store");
    assert_eq!(store.pem(), bundle.as_bytes());
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn repeated_builds_are_independent() {
    let builder = builder_for(store_with_ca_config_map(TEST_CA_CERT));
    let spec = spec_with_config_map("https://vault.example.com:8200");
    let ctx = ResolveContext::background();

    let first = builder.build(&spec, TEST_NAMESPACE, &ctx).await.unwrap();
    let second = builder.build(&spec, TEST_NAMESPACE, &ctx).await.unwrap();

    assert_eq!(first.server_name(), second.server_name());
    assert_eq!(first.trust_store().unwrap().pem(), second.trust_store().unwrap().pem());

    let first_roots = first.tls().root_store.as_ref().unwrap();
    let second_roots = second.tls().root_store.as_ref().unwrap();
    assert!(!Arc::ptr_eq(first_roots, second_roots));
}

#[tokio::test]
async fn concurrent_builds_share_nothing() {
    let store = Arc::new(CountingStore::new(store_with_ca_config_map(TEST_CA_CERT)));
    let builder = Arc::new(backend_trust::SecureConfigBuilder::new(store.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let builder = Arc::clone(&builder);
            tokio::spawn(async move {
                let spec = spec_with_config_map(&format!("https://vault-{i}.example.com:8200"));
                builder.build(&spec, TEST_NAMESPACE, &ResolveContext::background()).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let config = handle.await.expect("task").expect("build");
        assert_eq!(config.server_name(), format!("vault-{i}.example.com"));
    }
    assert_eq!(store.calls(), 8, "one lookup per build");
}
