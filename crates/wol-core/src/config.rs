//! Control server configuration value object.
//!
//! [`WolConfig`] is the single configuration instance the server guards.  It
//! is serialised with camelCase keys, which is both the JSON shape of
//! `GET /config` and the key naming of the on-disk TOML file:
//!
//! ```toml
//! authToken = "s3cr3t"
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
//! # Partial updates
//!
//! `POST /config` carries only the fields the caller wants to change.  The
//! body is decoded into [`ConfigUpdate`], where every field is an `Option`.
//! [`ConfigUpdate::apply_to`] builds a complete candidate config from the
//! current one and validates it as a whole; the caller swaps it in only if
//! every check passes, so a rejected update never leaves a half-applied
//! config behind.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::magic_packet::{format_mac, is_valid_mac};

/// Errors produced when a config (or an update to it) breaks an invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// A port field is outside `1..=65535` (after truncation to an integer).
    #[error("{field} must be between 1 and 65535, got {value}")]
    InvalidPort { field: &'static str, value: f64 },

    /// The target MAC is non-empty but not in canonical form.
    #[error("invalid MAC address format: {0:?} (expected AA:BB:CC:DD:EE:FF)")]
    InvalidMacAddress(String),

    /// The broadcast address is empty or not a plausible host name / IP.
    #[error("invalid broadcast address: {0:?}")]
    InvalidBroadcastAddress(String),

    /// An allowlist entry is empty.
    #[error("IP allowlist entries must not be empty")]
    EmptyAllowlistEntry,
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// The complete runtime configuration of the control server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WolConfig {
    /// Bearer credential for API calls.  Empty means "not configured".
    #[serde(default)]
    pub auth_token: String,
    /// Password for the dashboard login endpoint.
    #[serde(default = "default_web_password")]
    pub web_password: String,
    /// MAC of the machine to wake.  Empty means "not configured".
    #[serde(default)]
    pub target_mac_address: String,
    /// Destination of the magic packet: dotted quad or host name.
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: String,
    /// UDP destination port of the magic packet.
    #[serde(default = "default_wol_port")]
    pub wol_port: u16,
    /// TCP port the control API listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// CIDR ranges or single addresses allowed to reach the API.
    /// Empty allows everyone.
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
    /// Declarative flag; TLS termination is handled outside this server.
    #[serde(default)]
    pub https_enabled: bool,
    /// Consumed by the host service manager, not by this server.
    #[serde(default = "default_true")]
    pub auto_start_enabled: bool,
    /// When `false`, `/wake` and `/config` skip token checks entirely.
    #[serde(default = "default_true")]
    pub require_authentication: bool,
}

fn default_web_password() -> String {
    "admin123".to_string()
}
fn default_broadcast_address() -> String {
    "255.255.255.255".to_string()
}
fn default_wol_port() -> u16 {
    9
}
fn default_http_port() -> u16 {
    8085
}
fn default_true() -> bool {
    true
}

impl Default for WolConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            web_password: default_web_password(),
            target_mac_address: String::new(),
            broadcast_address: default_broadcast_address(),
            wol_port: default_wol_port(),
            http_port: default_http_port(),
            ip_allowlist: Vec::new(),
            https_enabled: false,
            auto_start_enabled: true,
            require_authentication: true,
        }
    }
}

impl WolConfig {
    /// Returns `true` when a target MAC has been configured.
    pub fn has_target(&self) -> bool {
        !self.target_mac_address.is_empty()
    }

    /// Returns `true` if the stored MAC is in canonical form.
    pub fn is_valid_mac_address(&self) -> bool {
        is_valid_mac(&self.target_mac_address)
    }

    /// Checks every invariant a persisted config must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigValidationError`] found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, port) in [("wolPort", self.wol_port), ("httpPort", self.http_port)] {
            if !is_valid_port(f64::from(port)) {
                return Err(ConfigValidationError::InvalidPort {
                    field,
                    value: f64::from(port),
                });
            }
        }
        if self.has_target() && !self.is_valid_mac_address() {
            return Err(ConfigValidationError::InvalidMacAddress(
                self.target_mac_address.clone(),
            ));
        }
        if !is_valid_host(&self.broadcast_address) {
            return Err(ConfigValidationError::InvalidBroadcastAddress(
                self.broadcast_address.clone(),
            ));
        }
        if self.ip_allowlist.iter().any(|entry| entry.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyAllowlistEntry);
        }
        Ok(())
    }
}

impl WolConfig {
    /// Returns a copy that satisfies [`WolConfig::validate`].
    ///
    /// Used on values read from disk, which may have been edited by hand:
    ///
    /// | Field              | Repair                                         |
    /// |--------------------|------------------------------------------------|
    /// | `targetMacAddress` | trimmed and normalised to `AA:BB:CC:DD:EE:FF`; cleared if it is not 12 hex digits |
    /// | `broadcastAddress` | trimmed; default if not a plausible host       |
    /// | `wolPort`          | default if `0`                                 |
    /// | `httpPort`         | default if `0`                                 |
    /// | `ipAllowlist`      | entries trimmed, blank entries dropped         |
    ///
    /// Compare the result with `self` to find out whether anything changed.
    pub fn repaired(&self) -> WolConfig {
        let mut fixed = self.clone();

        let mac = format_mac(self.target_mac_address.trim());
        fixed.target_mac_address = if mac.is_empty() || is_valid_mac(&mac) {
            mac
        } else {
            String::new()
        };

        let broadcast = self.broadcast_address.trim();
        fixed.broadcast_address = if is_valid_host(broadcast) {
            broadcast.to_string()
        } else {
            default_broadcast_address()
        };

        if fixed.wol_port == 0 {
            fixed.wol_port = default_wol_port();
        }
        if fixed.http_port == 0 {
            fixed.http_port = default_http_port();
        }

        fixed.ip_allowlist = self
            .ip_allowlist
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        fixed
    }
}

/// Returns `true` if `port` lies in `1..=65535`.
pub fn is_valid_port(port: f64) -> bool {
    port.is_finite() && (1.0..=65535.0).contains(&port)
}

/// Returns `true` for an IP literal or a syntactically plausible host name.
///
/// Resolution is deferred to send time; this only rejects values that can
/// never resolve (empty, whitespace, stray punctuation).
pub fn is_valid_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    !host.is_empty()
        && host.len() <= 253
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_'))
}

// ── Partial update ────────────────────────────────────────────────────────────

/// Body of `POST /config`: every field is optional.
///
/// Ports arrive as JSON numbers and are truncated toward zero, so `8080.9`
/// becomes `8080`.  A JSON `null` is treated the same as an absent field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    pub auth_token: Option<String>,
    pub web_password: Option<String>,
    pub target_mac_address: Option<String>,
    pub broadcast_address: Option<String>,
    pub wol_port: Option<f64>,
    pub http_port: Option<f64>,
    pub ip_allowlist: Option<Vec<String>>,
    pub https_enabled: Option<bool>,
    pub auto_start_enabled: Option<bool>,
    pub require_authentication: Option<bool>,
}

impl ConfigUpdate {
    /// Builds the config that results from applying this update to `current`.
    ///
    /// `current` is never modified.  Allowlist entries are trimmed and blank
    /// entries dropped before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] if the resulting config would break
    /// an invariant.
    pub fn apply_to(&self, current: &WolConfig) -> Result<WolConfig, ConfigValidationError> {
        let mut next = current.clone();

        if let Some(token) = &self.auth_token {
            next.auth_token = token.clone();
        }
        if let Some(password) = &self.web_password {
            next.web_password = password.clone();
        }
        if let Some(mac) = &self.target_mac_address {
            next.target_mac_address = mac.trim().to_string();
        }
        if let Some(address) = &self.broadcast_address {
            next.broadcast_address = address.trim().to_string();
        }
        if let Some(port) = self.wol_port {
            next.wol_port = truncate_port("wolPort", port)?;
        }
        if let Some(port) = self.http_port {
            next.http_port = truncate_port("httpPort", port)?;
        }
        if let Some(list) = &self.ip_allowlist {
            next.ip_allowlist = list
                .iter()
                .map(|entry| entry.trim())
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(flag) = self.https_enabled {
            next.https_enabled = flag;
        }
        if let Some(flag) = self.auto_start_enabled {
            next.auto_start_enabled = flag;
        }
        if let Some(flag) = self.require_authentication {
            next.require_authentication = flag;
        }

        next.validate()?;
        Ok(next)
    }

    /// Names of the fields present in this update (for logging; no values,
    /// so secrets never reach the log).
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let checks = [
            ("authToken", self.auth_token.is_some()),
            ("webPassword", self.web_password.is_some()),
            ("targetMacAddress", self.target_mac_address.is_some()),
            ("broadcastAddress", self.broadcast_address.is_some()),
            ("wolPort", self.wol_port.is_some()),
            ("httpPort", self.http_port.is_some()),
            ("ipAllowlist", self.ip_allowlist.is_some()),
            ("httpsEnabled", self.https_enabled.is_some()),
            ("autoStartEnabled", self.auto_start_enabled.is_some()),
            ("requireAuthentication", self.require_authentication.is_some()),
        ];
        for (name, present) in checks {
            if present {
                fields.push(name);
            }
        }
        fields
    }
}

fn truncate_port(field: &'static str, raw: f64) -> Result<u16, ConfigValidationError> {
    let value = raw.trunc();
    if !is_valid_port(value) {
        return Err(ConfigValidationError::InvalidPort { field, value: raw });
    }
    Ok(value as u16)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
