//! Storage infrastructure: configuration persistence.
//!
//! - [`TomlConfigStore`] reads and writes the config file in the
//!   platform-appropriate directory (or an explicit `--config` path).
//! - [`MemoryConfigStore`] keeps the config in memory, for tests and for
//!   embedding the service without touching the file system.
//!
//! Both implement [`crate::application::ConfigStore`].

pub mod config_store;

pub use config_store::{default_config_path, MemoryConfigStore, TomlConfigStore};
