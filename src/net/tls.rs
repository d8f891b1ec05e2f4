//! TLS client context construction.
//!
//! # Responsibilities
//! - Pick protocol versions from the configured algorithm name
//! - Choose trust material: trust-all, a configured trust store, or web PKI roots
//! - Load client identity from the key store
//!
//! # Design Decisions
//! - Hostname verification is always disabled (test endpoints rarely match)
//! - Handshake signatures are always verified, even in trust-all mode
//! - The crypto provider is passed explicitly; no process-wide default is installed
//! - A trust store is only loaded when one is configured

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::{VerifierBuilderError, WebPkiServerVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError, ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme,
    SupportedProtocolVersion,
};
use thiserror::Error;

use crate::config::Config;
use crate::net::store::StoreLoader;

/// Errors that can occur while building the TLS context.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Failed to read store '{path}': {source}")]
    StoreRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No certificates found in '{0}'")]
    NoCertificates(String),

    #[error("No private key found in '{0}'")]
    NoPrivateKey(String),

    #[error("Private key in '{0}' is encrypted; store passwords are not supported")]
    EncryptedPrivateKey(String),

    #[error("Unsupported store type '{0}'")]
    UnsupportedStoreType(String),

    #[error("Unsupported TLS protocol '{0}'")]
    UnsupportedProtocol(String),

    #[error("Invalid trust anchor in '{path}': {source}")]
    InvalidTrustAnchor {
        path: String,
        #[source]
        source: rustls::Error,
    },

    #[error("Certificate verifier setup failed: {0}")]
    Verifier(#[from] VerifierBuilderError),

    #[error("TLS error: {0}")]
    Rustls(#[from] rustls::Error),
}

static TLS12_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS12];
static TLS13_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS13];

/// Protocol versions for a configured algorithm name.
///
/// `None`, `TLS` and `SSL` mean every version the provider supports.
pub fn protocol_versions(
    algorithm: Option<&str>,
) -> Result<&'static [&'static SupportedProtocolVersion], TlsError> {
    let Some(algorithm) = algorithm else {
        return Ok(rustls::DEFAULT_VERSIONS);
    };
    match algorithm.to_ascii_uppercase().as_str() {
        "TLS" | "SSL" => Ok(rustls::DEFAULT_VERSIONS),
        "TLSV1.2" => Ok(TLS12_ONLY),
        "TLSV1.3" => Ok(TLS13_ONLY),
        _ => Err(TlsError::UnsupportedProtocol(algorithm.to_string())),
    }
}

/// Accepts every server certificate; still checks handshake signatures.
#[derive(Debug)]
struct TrustAllVerifier {
    algorithms: WebPkiSupportedAlgorithms,
}

impl ServerCertVerifier for TrustAllVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

/// Web PKI verification without hostname checks, optionally accepting
/// single-certificate (self-signed) chains.
#[derive(Debug)]
struct LenientVerifier {
    inner: Arc<WebPkiServerVerifier>,
    accept_self_signed: bool,
}

impl ServerCertVerifier for LenientVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        match self
            .inner
            .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now)
        {
            Ok(verified) => Ok(verified),
            Err(rustls::Error::InvalidCertificate(
                CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
            )) => Ok(ServerCertVerified::assertion()),
            Err(err) if self.accept_self_signed && intermediates.is_empty() => {
                tracing::trace!(error = %err, "Accepting self-signed server certificate");
                Ok(ServerCertVerified::assertion())
            }
            Err(err) => Err(err),
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

fn lenient_verifier(
    roots: RootCertStore,
    accept_self_signed: bool,
    provider: &Arc<CryptoProvider>,
) -> Result<Arc<dyn ServerCertVerifier>, TlsError> {
    let inner = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), Arc::clone(provider)).build()?;
    Ok(Arc::new(LenientVerifier {
        inner,
        accept_self_signed,
    }))
}

/// Build the TLS client context described by `config`.
pub fn build_tls_config(config: &Config, loader: &dyn StoreLoader) -> Result<ClientConfig, TlsError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let versions = protocol_versions(config.ssl_algorithm.as_deref())?;

    let (verifier, trust) = match config.trust_store() {
        None if config.ssl_trust_all => {
            let verifier: Arc<dyn ServerCertVerifier> = Arc::new(TrustAllVerifier {
                algorithms: provider.signature_verification_algorithms,
            });
            (verifier, "all")
        }
        None => {
            let roots: RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
            (lenient_verifier(roots, false, &provider)?, "web-pki")
        }
        Some(store) => {
            let mut roots = RootCertStore::empty();
            for cert in loader.load_trust_anchors(&store)? {
                roots.add(cert).map_err(|source| TlsError::InvalidTrustAnchor {
                    path: store.path.clone(),
                    source,
                })?;
            }
            (lenient_verifier(roots, config.ssl_trust_all, &provider)?, "store")
        }
    };

    let builder = ClientConfig::builder_with_provider(provider)
        .with_protocol_versions(versions)?
        .dangerous()
        .with_custom_certificate_verifier(verifier);

    let key_store = config.key_store();
    let mut tls = match &key_store {
        Some(store) => {
            let identity = loader.load_identity(store)?;
            builder.with_client_auth_cert(identity.chain, identity.key)?
        }
        None => builder.with_no_client_auth(),
    };
    tls.alpn_protocols = vec![b"http/1.1".to_vec()];

    tracing::info!(
        trust,
        algorithm = config.ssl_algorithm.as_deref().unwrap_or("TLS"),
        client_identity = key_store.is_some(),
        "TLS context built"
    );
    Ok(tls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreRef;
    use crate::net::store::{Identity, PemStoreLoader};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixture(name: &str) -> String {
        format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    /// Counts calls and delegates to the PEM loader.
    #[derive(Debug, Default)]
    struct CountingLoader {
        trust_calls: AtomicUsize,
        identity_calls: AtomicUsize,
    }

    impl StoreLoader for CountingLoader {
        fn load_trust_anchors(&self, store: &StoreRef) -> Result<Vec<CertificateDer<'static>>, TlsError> {
            self.trust_calls.fetch_add(1, Ordering::SeqCst);
            PemStoreLoader.load_trust_anchors(store)
        }

        fn load_identity(&self, store: &StoreRef) -> Result<Identity, TlsError> {
            self.identity_calls.fetch_add(1, Ordering::SeqCst);
            PemStoreLoader.load_identity(store)
        }
    }

    #[test]
    fn test_protocol_versions() {
        assert_eq!(protocol_versions(None).unwrap().len(), rustls::DEFAULT_VERSIONS.len());
        assert_eq!(protocol_versions(Some("tls")).unwrap().len(), rustls::DEFAULT_VERSIONS.len());
        assert_eq!(protocol_versions(Some("TLSv1.2")).unwrap().len(), 1);
        assert_eq!(protocol_versions(Some("TLSv1.3")).unwrap().len(), 1);
        assert!(matches!(protocol_versions(Some("SSLv3")), Err(TlsError::UnsupportedProtocol(_))));
    }

    #[test]
    fn test_trust_all_never_loads_trust_store() {
        let loader = CountingLoader::default();
        let config = Config {
            ssl_enabled: true,
            ssl_trust_all: true,
            ..Config::default()
        };
        build_tls_config(&config, &loader).unwrap();
        assert_eq!(loader.trust_calls.load(Ordering::SeqCst), 0);
        assert_eq!(loader.identity_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trust_store_and_identity_are_loaded() {
        let loader = CountingLoader::default();
        let config = Config {
            ssl_enabled: true,
            ssl_trust_all: false,
            ssl_trust_store: Some(fixture("self_signed.crt")),
            ssl_key_store: Some(fixture("identity.pem")),
            ssl_key_store_password: Some("ignored".into()),
            ..Config::default()
        };
        let tls = build_tls_config(&config, &loader).unwrap();
        assert_eq!(loader.trust_calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.identity_calls.load(Ordering::SeqCst), 1);
        assert!(tls.client_auth_cert_resolver.has_certs());
    }

    #[test]
    fn test_default_roots_without_trust_all() {
        let config = Config {
            ssl_enabled: true,
            ssl_trust_all: false,
            ssl_algorithm: Some("TLSv1.3".into()),
            ..Config::default()
        };
        assert!(build_tls_config(&config, &PemStoreLoader).is_ok());
    }

    #[test]
    fn test_missing_trust_store_fails_immediately() {
        let config = Config {
            ssl_enabled: true,
            ssl_trust_store: Some("/no/such/ca.pem".into()),
            ..Config::default()
        };
        assert!(matches!(
            build_tls_config(&config, &PemStoreLoader),
            Err(TlsError::StoreRead { .. })
        ));
    }
}
