use std::time::{Duration, Instant};

use backend_trust::store::StoreError;
use backend_trust::{
    AccessError, BackendProviderSpec, CaProviderSpec, Error, ResolveContext, TrustError,
    TrustSettings,
};

use super::support::{builder_for, ForbiddenStore, StalledStore, CA_KEY, CA_OBJECT, TEST_NAMESPACE};

fn spec() -> BackendProviderSpec {
    BackendProviderSpec::new("https://vault.example.com:8200")
        .with_ca_provider(CaProviderSpec::config_map(CA_OBJECT, CA_KEY))
}

#[tokio::test]
async fn cancelling_context_aborts_lookup() {
    let builder = builder_for(StalledStore::default());
    let ctx = ResolveContext::background();

    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = builder.build(&spec(), TEST_NAMESPACE, &ctx).await.expect_err("cancelled");

    assert!(started.elapsed() < Duration::from_secs(5), "lookup should abort promptly");
    let trust = err.as_trust().expect("trust error");
    assert!(trust.is_cancelled(), "unexpected error: {trust}");
}

#[tokio::test]
async fn already_cancelled_context_fails_fast() {
    let builder = builder_for(StalledStore::default());
    let ctx = ResolveContext::background();
    ctx.cancel();

    let err = builder.build(&spec(), TEST_NAMESPACE, &ctx).await.expect_err("cancelled");
    assert!(err.as_trust().is_some_and(TrustError::is_cancelled));
}

#[tokio::test]
async fn context_timeout_surfaces_deadline() {
    let builder = builder_for(StalledStore::default());
    let ctx = ResolveContext::background().with_timeout(Duration::from_millis(50));

    let err = builder.build(&spec(), TEST_NAMESPACE, &ctx).await.expect_err("timed out");
    assert!(matches!(
        err,
        Error::Trust(TrustError::SourceAccess {
            source: AccessError::DeadlineExceeded { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn settings_timeout_applies_when_context_has_none() {
    let builder = builder_for(StalledStore { delay: Duration::from_secs(10) })
        .with_settings(TrustSettings { lookup_timeout_seconds: 1, ..Default::default() });

    let started = Instant::now();
    let err = builder
        .build(&spec(), TEST_NAMESPACE, &ResolveContext::background())
        .await
        .expect_err("timed out");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(
        err.as_trust(),
        Some(TrustError::SourceAccess { source: AccessError::DeadlineExceeded { .. }, .. })
    ));
}

#[tokio::test]
async fn store_failure_is_access_error() {
    let builder = builder_for(ForbiddenStore);
    let err = builder
        .build(&spec(), TEST_NAMESPACE, &ResolveContext::background())
        .await
        .expect_err("forbidden");

    match err {
        Error::Trust(TrustError::SourceAccess {
            source: AccessError::Store(StoreError::Forbidden { key, .. }),
            ..
        }) => assert_eq!(key, format!("ConfigMap {TEST_NAMESPACE}/{CA_OBJECT}")),
        other => panic!("unexpected error: {other}"),
    }
}
