//! TLS setup of the direct transport against a self-signed endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use rustls::pki_types::CertificateDer;
use serde_json::json;

use scenario_http::config::{Config, ConfigError, StoreRef};
use scenario_http::net::{Identity, PemStoreLoader, StoreLoader, TlsError};
use scenario_http::{DirectClient, HttpClient, HttpRequest, TransportError};

mod common;

/// Delegates to the PEM loader and counts what was asked for.
#[derive(Debug, Default)]
struct RecordingLoader {
    trust_calls: AtomicUsize,
    identity_calls: AtomicUsize,
}

impl StoreLoader for RecordingLoader {
    fn load_trust_anchors(&self, store: &StoreRef) -> Result<Vec<CertificateDer<'static>>, TlsError> {
        self.trust_calls.fetch_add(1, Ordering::SeqCst);
        PemStoreLoader.load_trust_anchors(store)
    }

    fn load_identity(&self, store: &StoreRef) -> Result<Identity, TlsError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        PemStoreLoader.load_identity(store)
    }
}

async fn start_secure_backend() -> std::net::SocketAddr {
    common::start_tls_backend(Router::new().route("/", get(|| async { "secure" }))).await
}

#[tokio::test]
async fn test_trust_all_accepts_self_signed_without_loading_trust_store() {
    let addr = start_secure_backend().await;
    let loader = Arc::new(RecordingLoader::default());
    let config = Config {
        ssl_enabled: true,
        ssl_trust_all: true,
        ..Config::default()
    };
    let client = DirectClient::with_store_loader(config, loader.clone()).unwrap();

    let mut request = HttpRequest::new("GET", format!("https://localhost:{}/", addr.port()));
    let response = client.invoke(&mut request).await.unwrap();
    assert_eq!(response.text(), "secure");
    assert_eq!(loader.trust_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_configured_trust_store_is_used() {
    let addr = start_secure_backend().await;
    let loader = Arc::new(RecordingLoader::default());
    let config = Config {
        ssl_enabled: true,
        ssl_trust_all: false,
        ssl_trust_store: Some(common::fixture("self_signed.crt")),
        ..Config::default()
    };
    let client = DirectClient::with_store_loader(config, loader.clone()).unwrap();
    assert_eq!(loader.trust_calls.load(Ordering::SeqCst), 1);

    let mut request = HttpRequest::new("GET", format!("https://{addr}/"));
    assert_eq!(client.invoke(&mut request).await.unwrap().status, 200);
}

#[tokio::test]
async fn test_key_store_is_loaded_as_client_identity() {
    let addr = start_secure_backend().await;
    let loader = Arc::new(RecordingLoader::default());
    let mut config = Config::default();
    config
        .configure(
            "ssl",
            &json!({ "keyStore": common::fixture("identity.pem"), "keyStorePassword": "changeit" }),
        )
        .unwrap();
    let client = DirectClient::with_store_loader(config, loader.clone()).unwrap();
    assert_eq!(loader.identity_calls.load(Ordering::SeqCst), 1);

    let mut request = HttpRequest::new("GET", format!("https://localhost:{}/", addr.port()));
    assert_eq!(client.invoke(&mut request).await.unwrap().text(), "secure");
}

#[tokio::test]
async fn test_web_pki_roots_reject_self_signed() {
    let addr = start_secure_backend().await;
    let config = Config {
        ssl_enabled: true,
        ssl_trust_all: false,
        ..Config::default()
    };
    let client = DirectClient::new(config).unwrap();

    let mut request = HttpRequest::new("GET", format!("https://localhost:{}/", addr.port()));
    let err = client.invoke(&mut request).await.unwrap_err();
    assert!(matches!(err, TransportError::Http(_)));
}

#[tokio::test]
async fn test_pinned_protocol_version() {
    let addr = start_secure_backend().await;
    let config = Config {
        ssl_enabled: true,
        ssl_algorithm: Some("TLSv1.2".into()),
        ..Config::default()
    };
    let client = DirectClient::new(config).unwrap();

    let mut request = HttpRequest::new("GET", format!("https://localhost:{}/", addr.port()));
    assert_eq!(client.invoke(&mut request).await.unwrap().status, 200);
}

#[tokio::test]
async fn test_tls_failure_is_a_configuration_error() {
    let mut client = DirectClient::new(Config::default()).unwrap();

    let unsupported = Config {
        ssl_enabled: true,
        ssl_algorithm: Some("SSLv3".into()),
        ..Config::default()
    };
    let err = client.configure(unsupported, Some("ssl")).unwrap_err();
    assert!(matches!(err, ConfigError::Tls(TlsError::UnsupportedProtocol(_))));

    let missing = Config {
        ssl_enabled: true,
        ssl_trust_store: Some("/no/such/ca.pem".into()),
        ..Config::default()
    };
    let err = client.configure(missing, Some("ssl")).unwrap_err();
    assert!(matches!(err, ConfigError::Tls(TlsError::StoreRead { .. })));
    assert!(!client.config().ssl_enabled);
}
