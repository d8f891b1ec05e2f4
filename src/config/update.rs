//! Key-based configuration updates.
//!
//! The scenario engine changes transport settings one key at a time
//! (`configure ssl = { trustAll: true }`). Each update produces a new
//! snapshot and reports whether the HTTP client has to be reconfigured;
//! the key is then handed to [`HttpClient::configure`] as a hint.
//!
//! [`HttpClient::configure`]: crate::http::HttpClient::configure

use serde_json::{Map, Value};

use crate::config::loader::ConfigError;
use crate::config::schema::Config;

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn as_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| invalid(key, "expected a boolean"))
}

fn as_millis(key: &str, value: &Value) -> Result<u64, ConfigError> {
    value
        .as_u64()
        .ok_or_else(|| invalid(key, "expected a non-negative integer (milliseconds)"))
}

fn as_opt_string(key: &str, value: Option<&Value>) -> Result<Option<String>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(key, "expected a string")),
    }
}

impl Config {
    /// Apply one engine-level key.
    ///
    /// Returns `true` when the HTTP client must be reconfigured.
    pub fn configure(&mut self, key: &str, value: &Value) -> Result<bool, ConfigError> {
        let mut next = self.clone();
        let reconfigure = match key {
            "ssl" => {
                next.apply_ssl(value)?;
                true
            }
            "followRedirects" => {
                next.follow_redirects = as_bool(key, value)?;
                true
            }
            "connectTimeout" => {
                next.connect_timeout_millis = as_millis(key, value)?;
                true
            }
            "readTimeout" => {
                next.read_timeout_millis = as_millis(key, value)?;
                true
            }
            "localAddress" => {
                next.local_address = as_opt_string(key, Some(value))?;
                true
            }
            "proxy" => {
                next.apply_proxy(value)?;
                true
            }
            "showLog" => {
                next.show_log = as_bool(key, value)?;
                false
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *self = next;
        tracing::debug!(key, reconfigure, "Configuration updated");
        Ok(reconfigure)
    }

    fn apply_ssl(&mut self, value: &Value) -> Result<(), ConfigError> {
        match value {
            Value::Null => self.ssl_enabled = false,
            Value::Bool(enabled) => self.ssl_enabled = *enabled,
            Value::String(algorithm) => {
                self.ssl_enabled = true;
                self.ssl_algorithm = Some(algorithm.clone());
            }
            Value::Object(map) => self.apply_ssl_map(map)?,
            _ => return Err(invalid("ssl", "expected a boolean, protocol name or object")),
        }
        Ok(())
    }

    fn apply_ssl_map(&mut self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        let key = "ssl";
        self.ssl_enabled = true;
        self.ssl_algorithm = as_opt_string(key, map.get("algorithm"))?;
        self.ssl_trust_all = match map.get("trustAll") {
            None | Some(Value::Null) => true,
            Some(v) => as_bool("ssl.trustAll", v)?,
        };
        self.ssl_trust_store = as_opt_string(key, map.get("trustStore"))?;
        self.ssl_trust_store_password = as_opt_string(key, map.get("trustStorePassword"))?;
        self.ssl_trust_store_type = as_opt_string(key, map.get("trustStoreType"))?;
        self.ssl_key_store = as_opt_string(key, map.get("keyStore"))?;
        self.ssl_key_store_password = as_opt_string(key, map.get("keyStorePassword"))?;
        self.ssl_key_store_type = as_opt_string(key, map.get("keyStoreType"))?;
        Ok(())
    }

    fn apply_proxy(&mut self, value: &Value) -> Result<(), ConfigError> {
        self.proxy_uri = None;
        self.proxy_username = None;
        self.proxy_password = None;
        self.non_proxy_hosts = None;
        match value {
            Value::Null => {}
            Value::String(uri) => self.proxy_uri = Some(uri.clone()),
            Value::Object(map) => {
                let uri = as_opt_string("proxy.uri", map.get("uri"))?
                    .ok_or_else(|| invalid("proxy", "missing 'uri'"))?;
                self.proxy_uri = Some(uri);
                self.proxy_username = as_opt_string("proxy.username", map.get("username"))?;
                self.proxy_password = as_opt_string("proxy.password", map.get("password"))?;
                self.non_proxy_hosts = match map.get("nonProxyHosts") {
                    None | Some(Value::Null) => None,
                    Some(Value::Array(hosts)) => Some(
                        hosts
                            .iter()
                            .map(|h| {
                                h.as_str()
                                    .map(str::to_string)
                                    .ok_or_else(|| invalid("proxy.nonProxyHosts", "expected strings"))
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                    Some(_) => return Err(invalid("proxy.nonProxyHosts", "expected an array")),
                };
            }
            _ => return Err(invalid("proxy", "expected a URI string or object")),
        }
        Ok(())
    }
}
