//! Infrastructure layer for wol-server.
//!
//! Contains everything that touches the outside world:
//!
//! - [`http_server`]: the axum router, middleware, and `run_server` loop.
//! - [`dashboard`]: HTML rendering for `GET /`.
//! - [`sender`]: UDP magic packet transmission.
//! - [`network`]: local IPv4 discovery for the dashboard header.
//! - [`storage`]: the TOML config file store.

pub mod dashboard;
pub mod http_server;
pub mod network;
pub mod sender;
pub mod storage;

pub use http_server::{build_router, run_server};
pub use sender::UdpPacketSender;
pub use storage::{MemoryConfigStore, TomlConfigStore};
