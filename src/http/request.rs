//! Outgoing request as the engine describes it.
//!
//! # Responsibilities
//! - Carry method, URL, headers and optional body to a backend
//! - Receive the headers the backend actually sent
//! - Record start and end timestamps of the exchange
//!
//! # Design Decisions
//! - Timestamps are epoch milliseconds and are only set by backends
//! - The end timestamp is clamped so it never precedes the start

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::http::headers::Headers;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    start_time: Option<u64>,
    end_time: Option<u64>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    /// Record the moment the request goes on the wire.
    pub fn mark_start(&mut self) {
        self.start_time = Some(now_millis());
        self.end_time = None;
    }

    /// Record completion, never earlier than the start.
    pub fn mark_end(&mut self) {
        let now = now_millis();
        self.end_time = Some(match self.start_time {
            Some(start) => now.max(start),
            None => now,
        });
    }

    /// Elapsed milliseconds once both timestamps are set.
    pub fn elapsed_millis(&self) -> Option<u64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        }
    }
}
