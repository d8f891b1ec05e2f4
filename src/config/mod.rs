//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)          engine `configure key = value`
//!     → loader.rs                 → update.rs (one key, new snapshot)
//!     → validation.rs             → returns "client must reconfigure"
//!     → Config (immutable snapshot)
//!     → HttpClient::configure(config, changed_key)
//!     → backend re-derives its transport state
//! ```
//!
//! # Design Decisions
//! - Config is immutable once handed to a backend; changes replace the snapshot
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod update;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{Config, StoreRef, DEFAULT_TIMEOUT_MILLIS};
pub use validation::{validate_config, ValidationError};
