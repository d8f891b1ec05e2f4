//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Backends produce:
//!     → http_logger.rs (one entry per request and per response)
//!     → tracing events from every other subsystem
//!
//! Consumers:
//!     → logging.rs (tracing-subscriber registry, fmt layer to stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never preformatted messages
//! - Request logging can be switched off per configuration (`showLog`)
//! - The library never installs a subscriber; binaries call `logging::init`

pub mod http_logger;
pub mod logging;

pub use http_logger::HttpLogger;
