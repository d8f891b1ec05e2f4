//! Proxy selection.
//!
//! A configured proxy applies to every target except hosts listed in
//! `nonProxyHosts`. Those entries are compared by exact hostname equality;
//! no wildcards, no subdomain matching. Without a proxy URI the client keeps
//! reqwest's system proxy detection.

use reqwest::Proxy;
use url::Url;

use crate::config::{Config, ConfigError};

/// Parse a proxy URI, requiring a host.
pub fn parse_proxy_uri(uri: &str) -> Result<Url, String> {
    let url = Url::parse(uri).map_err(|e| e.to_string())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err("missing host".to_string()),
    }
}

/// Hosts that are reached without the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonProxyHosts {
    hosts: Vec<String>,
}

impl NonProxyHosts {
    pub fn new(hosts: &[String]) -> Self {
        Self {
            hosts: hosts.iter().map(|h| h.trim().to_string()).collect(),
        }
    }

    pub fn bypasses(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Build the proxy described by `config`, if any.
pub fn build_proxy(config: &Config) -> Result<Option<Proxy>, ConfigError> {
    let Some(uri) = config.proxy_uri.as_deref() else {
        return Ok(None);
    };
    let target = parse_proxy_uri(uri).map_err(|reason| ConfigError::InvalidProxyUri {
        uri: uri.to_string(),
        reason,
    })?;

    let exceptions = config
        .non_proxy_hosts
        .as_deref()
        .map(NonProxyHosts::new)
        .unwrap_or_default();

    let mut proxy = if exceptions.is_empty() {
        Proxy::all(target.as_str()).map_err(ConfigError::Client)?
    } else {
        Proxy::custom(move |url: &Url| match url.host_str() {
            Some(host) if exceptions.bypasses(host) => None,
            _ => Some(target.clone()),
        })
    };

    if let Some((user, pass)) = config.proxy_credentials() {
        proxy = proxy.basic_auth(user, pass);
    }

    tracing::debug!(
        proxy = uri,
        non_proxy_hosts = ?config.non_proxy_hosts,
        authenticated = config.proxy_credentials().is_some(),
        "Proxy configured"
    );
    Ok(Some(proxy))
}
