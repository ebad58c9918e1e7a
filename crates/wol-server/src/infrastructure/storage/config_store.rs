//! TOML-backed [`ConfigStore`] implementations.
//!
//! The default config file location is:
//! - Windows:  `%APPDATA%\WolServer\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/wolserver/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/WolServer/config.toml`
//!
//! # File format
//!
//! Keys use the same camelCase names as the JSON API, so a file written by
//! the service looks like:
//!
//! ```toml
//! authToken = "k3J9..."
//! webPassword = "admin123"
//! targetMacAddress = "AA:BB:CC:DD:EE:FF"
//! broadcastAddress = "192.168.1.255"
//! wolPort = 9
//! httpPort = 8085
//! ipAllowlist = ["192.168.1.0/24"]
//! httpsEnabled = false
//! autoStartEnabled = true
//! requireAuthentication = true
//! ```
//!
//! Missing keys fall back to their defaults, so a hand-written file only
//! needs the fields it changes.  A missing file means "all defaults".

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;
use wol_core::WolConfig;

use crate::application::ports::{ConfigStore, StorageError};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Stores the config as a TOML file at a fixed path.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `path` if given, otherwise the platform default location.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoPlatformConfigDir`] when no path was given
    /// and the platform directory cannot be determined.
    pub fn open(path: Option<&Path>) -> Result<Self, StorageError> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(default_config_path()?)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<WolConfig, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| StorageError::Format(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config file at {}; using defaults", self.path.display());
                Ok(WolConfig::default())
            }
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&self, config: &WolConfig) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            toml::to_string_pretty(config).map_err(|e| StorageError::Format(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("config written to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the config in memory only.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    stored: Mutex<Option<WolConfig>>,
}

impl MemoryConfigStore {
    /// A store that already holds `config`.
    pub fn with_config(config: WolConfig) -> Self {
        Self {
            stored: Mutex::new(Some(config)),
        }
    }

    /// The last saved config, or `None` if nothing was ever stored.
    pub fn stored(&self) -> Option<WolConfig> {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<WolConfig, StorageError> {
        Ok(self.stored().unwrap_or_default())
    }

    fn save(&self, config: &WolConfig) -> Result<(), StorageError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        Ok(())
    }
}

/// Returns the platform default config file path.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformConfigDir`] if the environment does not
/// say where the user's config directory is.
pub fn default_config_path() -> Result<PathBuf, StorageError> {
    platform_config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .ok_or(StorageError::NoPlatformConfigDir)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("WolServer"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("wolserver"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("WolServer")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
