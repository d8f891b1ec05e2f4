//! The contract every transport backend satisfies.

use std::future::Future;

use crate::config::{Config, ConfigError};
use crate::http::request::HttpRequest;
use crate::http::response::Response;
use crate::observability::HttpLogger;
use crate::transport::TransportError;

/// An HTTP backend the scenario engine can drive.
///
/// Implementations are interchangeable: the engine only ever talks to this
/// trait. `invoke` resolves after the whole response has been buffered and
/// stamps start/end times on `request`.
pub trait HttpClient {
    /// Execute one exchange.
    ///
    /// The request's headers are replaced by what was actually sent.
    fn invoke(
        &self,
        request: &mut HttpRequest,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;

    /// Replace the configuration snapshot and re-derive transport state.
    ///
    /// `changed_key` names the engine key that triggered the change, if any.
    /// On error the previous configuration stays active.
    fn configure(&mut self, config: Config, changed_key: Option<&str>) -> Result<(), ConfigError>;

    fn config(&self) -> &Config;

    fn logger(&self) -> &HttpLogger;
}
