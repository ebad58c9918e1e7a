//! # wol-core
//!
//! Shared library for the WOL control server containing the Wake-on-LAN
//! magic packet codec, the IP allowlist matcher, the control configuration
//! value object, and the authentication rules that guard the HTTP API.
//!
//! It has zero dependencies on sockets, file systems, or HTTP frameworks.
//!
//! # Architecture overview (for beginners)
//!
//! Wake-on-LAN (WOL) powers on a sleeping computer by broadcasting a small
//! UDP datagram (the "magic packet") on the local network.  The network card
//! of the target machine keeps listening while the computer is off and wakes
//! it when it sees its own MAC address repeated 16 times.
//!
//! The server crate exposes a tiny HTTP API that sends this packet on demand.
//! This crate is the part of the system with strict correctness rules:
//!
//! - **`magic_packet`** – MAC address parsing/formatting and the fixed
//!   102-byte payload layout.
//!
//! - **`cidr`** – Decides whether a requester's IP address falls inside one of
//!   the allowlisted ranges.  Malformed entries never match and never panic.
//!
//! - **`config`** – The single configuration object the server guards, plus
//!   the partial-update type used by `POST /config`.
//!
//! - **`auth`** – Bearer-token and dashboard-password checks.

pub mod auth;
pub mod cidr;
pub mod config;
pub mod magic_packet;

// Re-export the most-used items at the crate root so callers can write
// `wol_core::WolConfig` instead of `wol_core::config::WolConfig`.
pub use auth::{bearer_token, check_login, generate_token, is_authenticated};
pub use cidr::{is_allowed, matches};
pub use config::{ConfigUpdate, ConfigValidationError, WolConfig};
pub use magic_packet::{
    encode, format_mac, is_valid_mac, parse_mac, MacAddress, MacError, MAGIC_PACKET_SIZE,
};
