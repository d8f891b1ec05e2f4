//! In-process transport.
//!
//! Drives a `tower::Service` (typically an `axum::Router`) directly, no
//! socket involved. Cookies cross the boundary as structured values: the
//! request carries [`RequestCookies`] as an extension, and a handler can set
//! [`ResponseCookies`] on its response to have them rendered as
//! `Set-Cookie` headers.

use axum::body::Body;
use axum::http::{Request, Response as WireResponse, Uri};
use tower::{BoxError, Service, ServiceExt};

use crate::config::{Config, ConfigError};
use crate::http::{decode_cookie_request_header, Cookie, Headers, HttpClient, HttpRequest, Response, COOKIE, SET_COOKIE};
use crate::observability::HttpLogger;
use crate::transport::{wire_headers, wire_method, TransportError};

/// Cookies decoded from the request's `Cookie` headers.
///
/// Always present on requests built by [`InProcessClient`], possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies(pub Vec<Cookie>);

/// Cookies a handler wants sent back as `Set-Cookie` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCookies(pub Vec<Cookie>);

/// Backend that dispatches to an in-memory service.
#[derive(Debug)]
pub struct InProcessClient<S> {
    service: S,
    config: Config,
    logger: HttpLogger,
}

impl<S> InProcessClient<S> {
    pub fn new(service: S, config: Config) -> Self {
        Self {
            service,
            config,
            logger: HttpLogger::new(),
        }
    }

    fn build_request(request: &HttpRequest) -> Result<Request<Body>, TransportError> {
        let uri: Uri = request.url.parse().map_err(|e: axum::http::uri::InvalidUri| {
            TransportError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            }
        })?;
        let headers = wire_headers(&request.headers)?;
        let cookies: Vec<Cookie> = request
            .headers
            .get_all(COOKIE)
            .unwrap_or_default()
            .iter()
            .flat_map(|value| decode_cookie_request_header(value))
            .collect();
        let body = request.body.clone().map(Body::from).unwrap_or_else(Body::empty);

        let mut wire = Request::new(body);
        *wire.method_mut() = wire_method(&request.method)?;
        *wire.uri_mut() = uri;
        *wire.headers_mut() = headers;
        wire.extensions_mut().insert(RequestCookies(cookies));
        Ok(wire)
    }

    /// Response headers with handler cookies appended as `Set-Cookie`.
    fn response_headers(response: &WireResponse<Body>) -> Headers {
        let mut headers = Headers::from(response.headers());
        if let Some(ResponseCookies(cookies)) = response.extensions().get::<ResponseCookies>() {
            for cookie in cookies {
                let value = cookie.to_set_cookie_string();
                let present = headers
                    .get_all(SET_COOKIE)
                    .is_some_and(|values| values.contains(&value));
                if !present {
                    headers.add(SET_COOKIE, value);
                }
            }
        }
        headers
    }
}

impl<S> HttpClient for InProcessClient<S>
where
    S: Service<Request<Body>, Response = WireResponse<Body>> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    async fn invoke(&self, request: &mut HttpRequest) -> Result<Response, TransportError> {
        let wire = Self::build_request(request)?;
        request.headers = Headers::from(wire.headers());
        let seq = self.logger.log_request(&self.config, request);
        request.mark_start();

        let result = async {
            let response = self
                .service
                .clone()
                .oneshot(wire)
                .await
                .map_err(|e| TransportError::Service(e.into()))?;
            let status = response.status().as_u16();
            let headers = Self::response_headers(&response);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .map_err(|e| TransportError::Body(e.into()))?;
            Ok::<_, TransportError>(Response::new(status, headers, body.to_vec()))
        }
        .await;
        request.mark_end();

        match result {
            Ok(response) => {
                self.logger.log_response(&self.config, seq, request, &response);
                Ok(response)
            }
            Err(e) => {
                tracing::info!(url = %request.url, error = %e, "In-process request failed");
                Err(e)
            }
        }
    }

    fn configure(&mut self, config: Config, changed_key: Option<&str>) -> Result<(), ConfigError> {
        tracing::debug!(key = ?changed_key, "In-process transport reconfigured");
        self.config = config;
        Ok(())
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn logger(&self) -> &HttpLogger {
        &self.logger
    }
}
