//! Seams between the control logic and the outside world.
//!
//! The application layer only talks to persistence and to the network through
//! these two traits.  Infrastructure provides the real implementations
//! (`TomlConfigStore`, `UdpPacketSender`); unit tests substitute mocks.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use wol_core::{MacError, WolConfig};

/// Error type for configuration persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored document could not be parsed or produced.
    #[error("config format error: {0}")]
    Format(String),

    /// The background write task did not complete.
    #[error("config write interrupted: {0}")]
    Interrupted(String),
}

/// Error type for a single magic packet send.
#[derive(Debug, Error)]
pub enum SendError {
    /// The MAC text could not be parsed.
    #[error(transparent)]
    InvalidMacFormat(#[from] MacError),

    /// The broadcast address did not resolve to any socket address.
    #[error("could not resolve broadcast address {address:?}: {source}")]
    AddressResolution {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// Socket creation, option setting, or the send itself failed.
    #[error("UDP transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Persistent storage for the single [`WolConfig`].
///
/// Both operations are synchronous; the stored document is a few hundred
/// bytes.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore: Send + Sync {
    /// Loads the stored config, or defaults if nothing has been stored yet.
    fn load(&self) -> Result<WolConfig, StorageError>;

    /// Replaces the stored config.
    fn save(&self, config: &WolConfig) -> Result<(), StorageError>;
}

/// Sends Wake-on-LAN magic packets.
///
/// Success means the datagram was handed to the network stack; the protocol
/// has no acknowledgement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PacketSender: Send + Sync {
    /// Parses `mac`, resolves `broadcast_address`, and sends one 102-byte
    /// packet to `broadcast_address:port` with the broadcast flag set.
    async fn send_magic_packet(
        &self,
        mac: &str,
        broadcast_address: &str,
        port: u16,
    ) -> Result<(), SendError>;
}
