//! Transport backends.
//!
//! # Data Flow
//! ```text
//! HttpRequest
//!     → wire conversion (method, URL, headers checked here)
//!     → direct.rs      reqwest client rebuilt from Config, real sockets
//!     → in_process.rs  tower::Service driven in memory, no sockets
//!     → Response (status, normalized headers, buffered body)
//! ```
//!
//! # Design Decisions
//! - `Transport` is a closed sum of the two backends; the variant is picked
//!   at construction and calls are delegated, never type-inspected
//! - A failed exchange is reported once and never retried

pub mod direct;
pub mod in_process;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use thiserror::Error;
use tower::BoxError;

use crate::config::{Config, ConfigError};
use crate::http::{Headers, HttpClient, HttpRequest, Response};
use crate::observability::HttpLogger;

pub use direct::DirectClient;
pub use in_process::{InProcessClient, RequestCookies, ResponseCookies};

/// Failure of a single exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The in-process service returned an error.
    #[error("Service error: {0}")]
    Service(BoxError),

    #[error("Failed to read response body: {0}")]
    Body(BoxError),
}

/// Method as sent on the wire; names are upper-cased.
pub(crate) fn wire_method(method: &str) -> Result<Method, TransportError> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| TransportError::InvalidMethod(method.to_string()))
}

/// Every header value appended separately, in order.
pub(crate) fn wire_headers(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.pairs() {
        let invalid = || TransportError::InvalidHeader {
            name: name.to_string(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// The backend an engine runs against.
#[derive(Debug)]
pub enum Transport<S = axum::Router> {
    Direct(DirectClient),
    InProcess(InProcessClient<S>),
}

impl<S> From<DirectClient> for Transport<S> {
    fn from(client: DirectClient) -> Self {
        Transport::Direct(client)
    }
}

impl<S> From<InProcessClient<S>> for Transport<S> {
    fn from(client: InProcessClient<S>) -> Self {
        Transport::InProcess(client)
    }
}

impl<S> HttpClient for Transport<S>
where
    InProcessClient<S>: HttpClient + Sync,
{
    async fn invoke(&self, request: &mut HttpRequest) -> Result<Response, TransportError> {
        match self {
            Transport::Direct(client) => client.invoke(request).await,
            Transport::InProcess(client) => client.invoke(request).await,
        }
    }

    fn configure(&mut self, config: Config, changed_key: Option<&str>) -> Result<(), ConfigError> {
        match self {
            Transport::Direct(client) => client.configure(config, changed_key),
            Transport::InProcess(client) => client.configure(config, changed_key),
        }
    }

    fn config(&self) -> &Config {
        match self {
            Transport::Direct(client) => client.config(),
            Transport::InProcess(client) => client.config(),
        }
    }

    fn logger(&self) -> &HttpLogger {
        match self {
            Transport::Direct(client) => client.logger(),
            Transport::InProcess(client) => client.logger(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_method() {
        assert_eq!(wire_method("post").unwrap(), Method::POST);
        assert_eq!(wire_method("PATCH").unwrap(), Method::PATCH);
        assert!(matches!(wire_method("GE T"), Err(TransportError::InvalidMethod(_))));
    }

    #[test]
    fn test_wire_headers_keep_every_value() {
        let headers: Headers = [("Accept", "text/html"), ("accept", "application/json"), ("X-Id", "1")]
            .into_iter()
            .collect();
        let map = wire_headers(&headers).unwrap();
        assert_eq!(map.get_all("accept").iter().count(), 2);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_wire_headers_reject_bad_names() {
        let headers: Headers = [("Bad Name", "x")].into_iter().collect();
        assert!(matches!(
            wire_headers(&headers),
            Err(TransportError::InvalidHeader { name }) if name == "Bad Name"
        ));
    }
}
