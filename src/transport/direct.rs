//! Direct transport over real sockets.
//!
//! # Responsibilities
//! - Derive TLS, proxy, redirect, timeout and bind settings from `Config`
//! - Execute one exchange per `invoke` with a fresh cookie jar
//! - Capture the headers actually sent and the timing of the exchange
//!
//! # Design Decisions
//! - All settings are rebuilt on every `configure`; a failed rebuild keeps
//!   the previous settings and configuration
//! - A client is built per exchange so cookies never leak between requests
//!   but still flow across the redirect hops of one request
//! - Redirects are followed for every method, POST included, up to 10 hops

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{ACCEPT, CONTENT_LENGTH, HOST};
use axum::http::HeaderValue;
use reqwest::redirect;
use url::Url;

use crate::config::{Config, ConfigError};
use crate::http::{Headers, HttpClient, HttpRequest, Response};
use crate::net::{build_proxy, build_tls_config, resolve_local_address, PemStoreLoader, StoreLoader};
use crate::observability::HttpLogger;
use crate::transport::{wire_headers, wire_method, TransportError};

/// Maximum redirect hops followed within one exchange.
pub const MAX_REDIRECTS: usize = 10;

/// Everything derived from one configuration snapshot.
#[derive(Clone)]
struct TransportSettings {
    tls: Option<Arc<rustls::ClientConfig>>,
    proxy: Option<reqwest::Proxy>,
    local_address: Option<IpAddr>,
    follow_redirects: bool,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl fmt::Debug for TransportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSettings")
            .field("custom_tls", &self.tls.is_some())
            .field("proxy", &self.proxy.is_some())
            .field("local_address", &self.local_address)
            .field("follow_redirects", &self.follow_redirects)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

fn timeout(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

impl TransportSettings {
    fn derive(config: &Config, loader: &dyn StoreLoader) -> Result<Self, ConfigError> {
        let tls = if config.ssl_enabled {
            Some(Arc::new(build_tls_config(config, loader)?))
        } else {
            None
        };
        let settings = Self {
            tls,
            proxy: build_proxy(config)?,
            local_address: config.local_address.as_deref().and_then(resolve_local_address),
            follow_redirects: config.follow_redirects,
            connect_timeout: timeout(config.connect_timeout_millis),
            read_timeout: timeout(config.read_timeout_millis),
        };
        // dry build: reject settings reqwest cannot use
        settings.client().map_err(ConfigError::Client)?;
        Ok(settings)
    }

    fn client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let policy = if self.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(policy)
            .local_address(self.local_address);
        if let Some(tls) = &self.tls {
            builder = builder.use_preconfigured_tls(rustls::ClientConfig::clone(tls));
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.clone());
        }
        if let Some(connect) = self.connect_timeout {
            builder = builder.connect_timeout(connect);
        }
        if let Some(read) = self.read_timeout {
            builder = builder.read_timeout(read);
        }
        builder.build()
    }
}

/// Backend that talks to real servers.
#[derive(Debug)]
pub struct DirectClient {
    config: Config,
    settings: TransportSettings,
    loader: Arc<dyn StoreLoader>,
    logger: HttpLogger,
}

impl DirectClient {
    /// Build a client that reads stores as PEM files.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_store_loader(config, Arc::new(PemStoreLoader))
    }

    pub fn with_store_loader(config: Config, loader: Arc<dyn StoreLoader>) -> Result<Self, ConfigError> {
        let settings = TransportSettings::derive(&config, loader.as_ref())?;
        tracing::debug!(?settings, "Direct transport ready");
        Ok(Self {
            config,
            settings,
            loader,
            logger: HttpLogger::new(),
        })
    }

    /// Record what is about to go on the wire.
    ///
    /// Applies the `Accept` default and copies the final headers into
    /// `request`, including the `Host` and `Content-Length` the connection
    /// layer derives from the URL and body. Logs the request, stamps the
    /// start time and returns the log sequence number.
    fn intercept(&self, request: &mut HttpRequest, wire: &mut reqwest::Request) -> u64 {
        if !wire.headers().contains_key(ACCEPT) {
            wire.headers_mut().insert(ACCEPT, HeaderValue::from_static("*/*"));
        }
        let mut headers = Headers::from(wire.headers());
        if !headers.contains(HOST.as_str()) {
            if let Some(host) = host_header(wire.url()) {
                headers.add(HOST.as_str(), host);
            }
        }
        if !headers.contains(CONTENT_LENGTH.as_str()) {
            if let Some(bytes) = wire.body().and_then(reqwest::Body::as_bytes) {
                headers.add(CONTENT_LENGTH.as_str(), bytes.len().to_string());
            }
        }
        request.headers = headers;
        let seq = self.logger.log_request(&self.config, request);
        request.mark_start();
        seq
    }

    fn build_wire_request(
        client: &reqwest::Client,
        request: &HttpRequest,
    ) -> Result<reqwest::Request, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;
        let mut builder = client
            .request(wire_method(&request.method)?, url)
            .headers(wire_headers(&request.headers)?);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        Ok(builder.build()?)
    }
}

/// `Host` value for `url`: the host, plus the port when it is not the
/// scheme default.
fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

impl HttpClient for DirectClient {
    async fn invoke(&self, request: &mut HttpRequest) -> Result<Response, TransportError> {
        let client = self.settings.client()?;
        let mut wire = Self::build_wire_request(&client, request)?;
        let seq = self.intercept(request, &mut wire);

        let result = async {
            let response = client.execute(wire).await?;
            let status = response.status().as_u16();
            let headers = Headers::from(response.headers());
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(Response::new(status, headers, body))
        }
        .await;
        request.mark_end();

        match result {
            Ok(response) => {
                self.logger.log_response(&self.config, seq, request, &response);
                Ok(response)
            }
            Err(e) => {
                tracing::info!(url = %request.url, error = %e, "Request failed");
                Err(e.into())
            }
        }
    }

    fn configure(&mut self, config: Config, changed_key: Option<&str>) -> Result<(), ConfigError> {
        let settings = match TransportSettings::derive(&config, self.loader.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(key = ?changed_key, error = %e, "Reconfiguration failed, keeping previous settings");
                return Err(e);
            }
        };
        tracing::debug!(key = ?changed_key, ?settings, "Direct transport reconfigured");
        self.config = config;
        self.settings = settings;
        Ok(())
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn logger(&self) -> &HttpLogger {
        &self.logger
    }
}
