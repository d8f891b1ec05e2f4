//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::Request;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Serve `router` on an ephemeral local port.
pub async fn start_backend(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn headers_json(headers: &HeaderMap) -> Value {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(value.to_str().unwrap_or_default().to_string());
    }
    json!(map)
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "headers": headers_json(&headers),
        "body": body,
    }))
}

async fn landing(method: Method, headers: HeaderMap) -> String {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    format!("{} {}", method, cookie)
}

async fn hop() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "hop=1; Path=/")],
        Redirect::to("/landing"),
    )
}

/// Backend with an echo endpoint and a cookie-setting redirect.
///
/// - `/echo` returns method, headers and body as JSON
/// - `POST /redirect` sets `hop=1` and answers 303 to `/landing`
/// - `POST /redirect-keep` answers 307 to `/echo`, keeping method and body
/// - `/landing` returns `"<METHOD> <Cookie header or ->"`
/// - `/status/{code}` answers with that status and an empty body
pub fn test_router() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/redirect", post(hop))
        .route("/redirect-keep", post(|| async { Redirect::temporary("/echo") }))
        .route("/landing", get(landing))
        .route(
            "/status/{code}",
            get(|axum::extract::Path(code): axum::extract::Path<u16>| async move {
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
            }),
        )
}

/// Requests seen by the mock proxy: absolute URI and `Proxy-Authorization`.
pub type ProxyLog = Arc<Mutex<Vec<(String, Option<String>)>>>;

/// A forward proxy stand-in that answers every request itself.
pub async fn start_mock_proxy() -> (SocketAddr, ProxyLog) {
    let log: ProxyLog = Arc::default();
    let seen = log.clone();
    let router = Router::new().fallback(move |request: Request| {
        let seen = seen.clone();
        async move {
            let auth = request
                .headers()
                .get(header::PROXY_AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            seen.lock().unwrap().push((request.uri().to_string(), auth));
            "via-proxy"
        }
    });
    (start_backend(router).await, log)
}

/// Serve `router` over TLS with the self-signed localhost certificate.
pub async fn start_tls_backend(router: Router) -> SocketAddr {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
        fixture("self_signed.crt"),
        fixture("self_signed.key"),
    )
    .await
    .unwrap();
    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), config)
        .handle(handle.clone())
        .serve(router.into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });
    handle.listening().await.unwrap()
}
