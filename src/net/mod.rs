//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Config snapshot
//!     → tls.rs (protocol versions, certificate verifier, client identity)
//!         → store.rs (trust anchors and identity via StoreLoader)
//!     → proxy.rs (proxy URI, exact-host exceptions, proxy credentials)
//!     → address.rs (local bind address, best effort)
//!     → Hand off to transport::direct
//! ```
//!
//! # Design Decisions
//! - Everything here is derived from scratch on each reconfiguration
//! - TLS and proxy failures are configuration errors
//! - Local address failures are warnings

pub mod address;
pub mod proxy;
pub mod store;
pub mod tls;

pub use address::resolve_local_address;
pub use proxy::{build_proxy, parse_proxy_uri, NonProxyHosts};
pub use store::{Identity, PemStoreLoader, StoreLoader};
pub use tls::{build_tls_config, protocol_versions, TlsError};
