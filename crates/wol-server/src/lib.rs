//! wol-server library crate.
//!
//! An HTTP control service that lets an authenticated LAN client wake a
//! configured host with a Wake-on-LAN magic packet, and view or edit the
//! service's own configuration.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser / curl (HTTP + JSON)
//!         ↕
//! [wol-server]
//!   ├── domain/            Pure types: response DTOs, ServerSettings
//!   ├── application/       ControlService: auth, allowlist, wake, config update
//!   │     └── ports        ConfigStore and PacketSender traits
//!   └── infrastructure/
//!         ├── http_server  axum router, CORS + allowlist middleware
//!         ├── dashboard    HTML dashboard rendering
//!         ├── sender       UDP magic packet sender (tokio)
//!         ├── network      local IPv4 probe for the dashboard
//!         └── storage/     TOML config file store
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `wol-core`, and the port traits only.
//! - `infrastructure` depends on all other layers plus `tokio` and `axum`.

/// Domain layer: response shapes and listener settings (no I/O).
pub mod domain;

/// Application layer: the control service and its ports.
pub mod application;

/// Infrastructure layer: HTTP server, UDP sender, config file storage.
pub mod infrastructure;
