//! Configuration schema definitions.
//!
//! `Config` is the transport snapshot every backend is built from. It derives
//! Serde traits so it can be read from TOML or JSON using the engine's
//! camelCase option names (`sslEnabled`, `proxyUri`, ...).

use serde::{Deserialize, Serialize};

/// Default connect and read timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 30_000;

/// Transport configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Build a custom TLS context for HTTPS targets.
    pub ssl_enabled: bool,

    /// Protocol name (`TLS`, `TLSv1.2`, `TLSv1.3`); defaults to all supported versions.
    pub ssl_algorithm: Option<String>,

    /// Accept any server certificate when no trust store is configured.
    pub ssl_trust_all: bool,

    pub ssl_trust_store: Option<String>,
    pub ssl_trust_store_password: Option<String>,
    pub ssl_trust_store_type: Option<String>,

    pub ssl_key_store: Option<String>,
    pub ssl_key_store_password: Option<String>,
    pub ssl_key_store_type: Option<String>,

    /// Follow redirects automatically (including for POST).
    pub follow_redirects: bool,

    /// Connection establishment timeout; 0 disables it.
    pub connect_timeout_millis: u64,

    /// Socket read timeout; 0 disables it.
    pub read_timeout_millis: u64,

    /// Local IP or hostname to bind outgoing connections to.
    pub local_address: Option<String>,

    /// Proxy URI (e.g. `http://proxy:3128`).
    pub proxy_uri: Option<String>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,

    /// Hostnames that bypass the proxy (exact match).
    pub non_proxy_hosts: Option<Vec<String>>,

    /// Emit request/response log entries.
    pub show_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ssl_enabled: false,
            ssl_algorithm: None,
            ssl_trust_all: true,
            ssl_trust_store: None,
            ssl_trust_store_password: None,
            ssl_trust_store_type: None,
            ssl_key_store: None,
            ssl_key_store_password: None,
            ssl_key_store_type: None,
            follow_redirects: true,
            connect_timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            read_timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            local_address: None,
            proxy_uri: None,
            proxy_username: None,
            proxy_password: None,
            non_proxy_hosts: None,
            show_log: true,
        }
    }
}

/// A reference to a trust or key store: path, password and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRef {
    pub path: String,
    pub password: Option<String>,
    pub store_type: Option<String>,
}

impl Config {
    pub fn trust_store(&self) -> Option<StoreRef> {
        self.ssl_trust_store.as_ref().map(|path| StoreRef {
            path: path.clone(),
            password: self.ssl_trust_store_password.clone(),
            store_type: self.ssl_trust_store_type.clone(),
        })
    }

    pub fn key_store(&self) -> Option<StoreRef> {
        self.ssl_key_store.as_ref().map(|path| StoreRef {
            path: path.clone(),
            password: self.ssl_key_store_password.clone(),
            store_type: self.ssl_key_store_type.clone(),
        })
    }

    /// Proxy credentials, only when both halves are present.
    pub fn proxy_credentials(&self) -> Option<(&str, &str)> {
        match (&self.proxy_username, &self.proxy_password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
