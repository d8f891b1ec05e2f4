//! Scripting engine boundary.
//!
//! The scenario engine hands script functions to Rust code that expects a
//! supplier, a function, a consumer or a plain task. [`AsyncBridge`] lets a
//! single foreign callable stand in for all four.

pub mod bridge;

pub use bridge::{AsyncBridge, BridgeError, CallShape, ForeignCallable};
