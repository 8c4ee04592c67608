//! Client and server metadata snapshot.
//!
//! Client-side fields are process-wide constants derived from this crate's
//! version. Server-side fields are filled from the live session and are
//! zero/empty while disconnected. Versions use the classic MySQL numeric
//! encoding `MAJOR*10000 + MINOR*100 + PATCH`.

use serde::Serialize;

/// Version of the client/server handshake protocol spoken by the driver.
pub const PROTOCOL_VERSION: u32 = 10;

/// Read-only metadata snapshot for one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    /// Client library version, numerically encoded.
    pub client_version: u32,
    /// Client library version string.
    pub client_info: String,
    /// Server version, numerically encoded; 0 while disconnected.
    pub server_version: u64,
    /// Server version string; empty while disconnected.
    pub server_info: String,
    /// Transport description, e.g. `localhost via TCP/IP`; empty while disconnected.
    pub host_info: String,
    /// Protocol version; 0 while disconnected.
    pub protocol_version: u32,
}

impl ConnectionInfo {
    /// Snapshot for a disconnected instance: client fields only.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            client_version: client_version(),
            client_info: client_info(),
            server_version: 0,
            server_info: String::new(),
            host_info: String::new(),
            protocol_version: 0,
        }
    }

    /// Snapshot for a connected instance.
    pub(crate) fn connected(server: (u16, u16, u16), host_info: &str) -> Self {
        Self {
            client_version: client_version(),
            client_info: client_info(),
            server_version: encode_server_version(server),
            server_info: format!("{}.{}.{}", server.0, server.1, server.2),
            host_info: host_info.to_string(),
            protocol_version: PROTOCOL_VERSION,
        }
    }
}

/// Numeric client library version.
#[must_use]
pub fn client_version() -> u32 {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    let patch: u32 = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);
    major * 10_000 + minor * 100 + patch
}

/// Client library version string.
#[must_use]
pub fn client_info() -> String {
    concat!("mysql-sync/", env!("CARGO_PKG_VERSION")).to_string()
}

pub(crate) fn encode_server_version((major, minor, patch): (u16, u16, u16)) -> u64 {
    u64::from(major) * 10_000 + u64::from(minor) * 100 + u64::from(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_fields_always_populated() {
        let info = ConnectionInfo::disconnected();
        assert!(!info.client_info.is_empty());
        assert_eq!(info.client_version, client_version());
    }

    #[test]
    fn test_disconnected_server_fields_empty() {
        let info = ConnectionInfo::disconnected();
        assert_eq!(info.server_version, 0);
        assert!(info.server_info.is_empty());
        assert!(info.host_info.is_empty());
        assert_eq!(info.protocol_version, 0);
    }

    #[test]
    fn test_connected_snapshot() {
        let info = ConnectionInfo::connected((8, 0, 32), "localhost via TCP/IP");
        assert_eq!(info.server_version, 80_032);
        assert_eq!(info.server_info, "8.0.32");
        assert_eq!(info.host_info, "localhost via TCP/IP");
        assert_eq!(info.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn test_version_encoding() {
        assert_eq!(encode_server_version((5, 7, 44)), 50_744);
        assert_eq!(encode_server_version((11, 4, 2)), 110_402);
    }
}
