//! Local address discovery for the dashboard.
//!
//! The dashboard shows which address the service can be reached on.  We ask
//! the OS routing table by "connecting" an unbound UDP socket toward an
//! outside address (no packet is sent for UDP connect) and reading the
//! local address the kernel picked.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use tracing::debug;

/// TEST-NET-1 documentation address; only used to select a route.
const ROUTE_PROBE_TARGET: (Ipv4Addr, u16) = (Ipv4Addr::new(192, 0, 2, 1), 9);

/// Returns the primary non-loopback IPv4 address, or `127.0.0.1`.
pub fn local_ipv4() -> Ipv4Addr {
    probe_route().unwrap_or_else(|| {
        debug!("no routable IPv4 interface found; reporting loopback");
        Ipv4Addr::LOCALHOST
    })
}

fn probe_route() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(ROUTE_PROBE_TARGET).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}
