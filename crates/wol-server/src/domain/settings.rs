//! Listener settings.
//!
//! [`ServerSettings`] holds what the command line decides about the HTTP
//! listener.  The port normally comes from the stored `httpPort`; a command
//! line override wins for this process only and is never written back.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Where the HTTP listener binds.
///
/// # Example
///
/// ```rust
/// use wol_server::domain::ServerSettings;
///
/// let settings = ServerSettings::default();
/// assert_eq!(settings.listen_addr(8085).to_string(), "0.0.0.0:8085");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface address; `0.0.0.0` accepts LAN and localhost connections.
    pub bind_ip: IpAddr,

    /// Replaces the configured `httpPort` when set.
    pub port_override: Option<u16>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port_override: None,
        }
    }
}

impl ServerSettings {
    /// Socket address to bind, given the port from the stored config.
    pub fn listen_addr(&self, configured_port: u16) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port_override.unwrap_or(configured_port))
    }
}
