//! Pluggable HTTP transport for a scenario test engine.
//!
//! One [`HttpClient`] contract, two backends: [`DirectClient`] talks to real
//! servers over reqwest and rustls, [`InProcessClient`] drives a
//! `tower::Service` such as an `axum::Router` in memory. Both capture the
//! headers actually sent, start/end timing and cookies the same way.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod transport;

// Engine boundaries
pub mod script;

// Cross-cutting concerns
pub mod observability;

pub use config::{Config, ConfigError};
pub use http::{Cookie, Headers, HttpClient, HttpRequest, Response};
pub use observability::HttpLogger;
pub use script::{AsyncBridge, CallShape, ForeignCallable};
pub use transport::{DirectClient, InProcessClient, Transport, TransportError};
