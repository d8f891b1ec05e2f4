//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that proxy settings are usable
//! - Check that the TLS protocol name is supported
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs when configuration is loaded from a file; backends re-check what
//!   they need while deriving transport state

use thiserror::Error;

use crate::config::schema::Config;
use crate::net::{parse_proxy_uri, protocol_versions};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("proxy URI '{uri}' is invalid: {reason}")]
    InvalidProxyUri { uri: String, reason: String },

    #[error("proxy username and password must be set together")]
    IncompleteProxyCredentials,

    #[error("non-proxy host entries must not be empty")]
    EmptyNonProxyHost,

    #[error("unsupported TLS protocol '{0}'")]
    UnsupportedProtocol(String),
}

pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(uri) = &config.proxy_uri {
        if let Err(reason) = parse_proxy_uri(uri) {
            errors.push(ValidationError::InvalidProxyUri {
                uri: uri.clone(),
                reason,
            });
        }
    }

    if config.proxy_username.is_some() != config.proxy_password.is_some() {
        errors.push(ValidationError::IncompleteProxyCredentials);
    }

    if let Some(hosts) = &config.non_proxy_hosts {
        if hosts.iter().any(|h| h.trim().is_empty()) {
            errors.push(ValidationError::EmptyNonProxyHost);
        }
    }

    if let Some(algorithm) = &config.ssl_algorithm {
        if protocol_versions(Some(algorithm)).is_err() {
            errors.push(ValidationError::UnsupportedProtocol(algorithm.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
