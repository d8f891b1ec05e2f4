//! Request/response logging for backends.
//!
//! Each request gets a sequence number; the matching response entry reuses
//! it so interleaved logs can be paired up. Entries are `debug` events and
//! are skipped entirely when `showLog` is off.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Config;
use crate::http::{HttpRequest, Response};

#[derive(Debug, Default)]
pub struct HttpLogger {
    sequence: AtomicU64,
}

impl HttpLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests logged so far.
    pub fn count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Log `request` and return its sequence number, 0 when logging is off.
    pub fn log_request(&self, config: &Config, request: &HttpRequest) -> u64 {
        if !config.show_log {
            return 0;
        }
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(
            seq,
            method = %request.method,
            url = %request.url,
            headers = ?request.headers,
            body_bytes = request.body.as_ref().map_or(0, Vec::len),
            "request"
        );
        seq
    }

    /// Log `response` under the `seq` its request was logged with.
    pub fn log_response(&self, config: &Config, seq: u64, request: &HttpRequest, response: &Response) {
        if !config.show_log {
            return;
        }
        tracing::debug!(
            seq,
            url = %request.url,
            status = response.status,
            elapsed_ms = request.elapsed_millis().unwrap_or_default(),
            headers = ?response.headers,
            body_bytes = response.body.len(),
            "response"
        );
    }
}
