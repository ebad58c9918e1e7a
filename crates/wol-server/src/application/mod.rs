//! Application layer for wol-server.
//!
//! The application layer knows *what* the service does: who may call it,
//! which packet a wake sends, and how a config edit is checked and committed.
//! It delegates *how* to the infrastructure layer through the traits in
//! [`ports`].
//!
//! # What does NOT belong here?
//!
//! - HTTP routing, headers, or status codes (that is infrastructure)
//! - Opening sockets or files

pub mod control_service;
pub mod ports;

pub use control_service::{ControlError, ControlService, Credentials, WakeDispatch};
pub use ports::{ConfigStore, PacketSender, SendError, StorageError};
