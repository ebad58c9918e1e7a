//! UDP magic packet sender.
//!
//! # How a wake works (for beginners)
//!
//! Wake-on-LAN needs no connection: the NIC of a sleeping machine watches
//! every frame for its own MAC address repeated 16 times after six `0xFF`
//! bytes.  We put that 102-byte payload in one UDP datagram and send it to a
//! broadcast address so the switch floods it to every port.  Port 9
//! ("discard") is conventional but the NIC ignores the port entirely.
//!
//! The socket needs `SO_BROADCAST`; without it the kernel refuses to send to
//! `255.255.255.255` or a subnet broadcast address.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;
use wol_core::{encode, parse_mac, MAGIC_PACKET_SIZE};

use crate::application::ports::{PacketSender, SendError};

/// Sends magic packets from an ephemeral UDP socket.
///
/// A fresh socket is bound per send; nothing is held between wakes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpPacketSender;

#[async_trait]
impl PacketSender for UdpPacketSender {
    async fn send_magic_packet(
        &self,
        mac: &str,
        broadcast_address: &str,
        port: u16,
    ) -> Result<(), SendError> {
        let mac = parse_mac(mac)?;
        let packet = encode(&mac);
        let target = resolve(broadcast_address, port).await?;

        let local: SocketAddr = match target.ip() {
            IpAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            IpAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        socket.set_broadcast(true)?;

        let sent = socket.send_to(&packet, target).await?;
        if sent != MAGIC_PACKET_SIZE {
            return Err(SendError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short send: {sent} of {MAGIC_PACKET_SIZE} bytes"),
            )));
        }

        debug!("sent {MAGIC_PACKET_SIZE}-byte magic packet for {mac} to {target}");
        Ok(())
    }
}

/// Resolves `host:port`, preferring an IPv4 result.
async fn resolve(host: &str, port: u16) -> Result<SocketAddr, SendError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let resolution_error = |source| SendError::AddressResolution {
        address: host.to_string(),
        source,
    };
    let candidates: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(resolution_error)?
        .collect();
    debug!("{host} resolved to {candidates:?}");

    candidates
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| {
            resolution_error(io::Error::new(
                io::ErrorKind::NotFound,
                "no addresses returned",
            ))
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
