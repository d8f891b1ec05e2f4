//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Mock definitions (at startup):
//!     "/users/{id}/orders/{orderId}"
//!     → pattern.rs (split once into literal and placeholder segments)
//!
//! Incoming path:
//!     "/users/42/orders/7"
//!     → UriPattern::matches (segment by segment)
//!     → Return: placeholder bindings or no match
//! ```
//!
//! # Design Decisions
//! - No regex: literal comparison plus single-segment placeholders
//! - Deterministic: same input always yields the same bindings
//! - Matching never fails; a mismatch is `None`

pub mod pattern;

pub use pattern::{parse_uri_pattern, UriPattern};
