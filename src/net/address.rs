//! Local bind address resolution.

use std::net::{IpAddr, ToSocketAddrs};

/// Resolve the configured local address to an IP.
///
/// Accepts an IP literal or a hostname. Resolution failure is not fatal:
/// it is logged and the client proceeds without binding.
pub fn resolve_local_address(address: &str) -> Option<IpAddr> {
    let address = address.trim();
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Some(ip);
    }
    match (address, 0).to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => Some(addr.ip()),
            None => {
                tracing::warn!(address, "Local address resolved to nothing, not binding");
                None
            }
        },
        Err(e) => {
            tracing::warn!(address, error = %e, "Failed to resolve local address, not binding");
            None
        }
    }
}
