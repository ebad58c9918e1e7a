//! ControlService: the shared state behind every HTTP request.
//!
//! The service owns the in-memory [`WolConfig`] and the two ports it needs:
//! a [`ConfigStore`] to persist edits and a [`PacketSender`] to put magic
//! packets on the wire.
//!
//! # Concurrency
//!
//! The config sits behind a `tokio::sync::RwLock`.  Readers (auth checks,
//! allowlist checks, dashboard rendering) take a snapshot under the read
//! lock.  An update holds the write lock while it validates, persists, and
//! swaps, so concurrent updates serialize and a reader sees either the old
//! config or the new one, never a mix.
//!
//! # Persist-then-swap
//!
//! The candidate config is written to the store *before* it replaces the
//! in-memory copy.  If the write fails the running service keeps the old
//! config and the caller gets [`ControlError::Storage`].
//!
//! `ConfigStore::save` is synchronous file I/O, so it runs on the blocking
//! pool via `spawn_blocking`.  The write lock stays held across that await,
//! which keeps updates serialized without stalling a runtime worker.

use std::net::IpAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use wol_core::{
    check_login, cidr, generate_token, is_authenticated, ConfigUpdate, ConfigValidationError,
    WolConfig,
};

use super::ports::{ConfigStore, PacketSender, SendError, StorageError};

/// Error type for control operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The request carried no valid token.
    #[error("Authentication required")]
    Unauthorized,

    /// A wake was requested but no target MAC is configured.
    #[error("MAC address not configured")]
    NoTarget,

    /// A config update produced an invalid config.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigValidationError),

    /// The config store rejected the write.
    #[error("failed to save configuration: {0}")]
    Storage(#[from] StorageError),
}

/// Token material presented with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Value after `Bearer ` in the `Authorization` header.
    pub bearer: Option<String>,
    /// Value of the `token` query parameter.
    pub query_token: Option<String>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
            query_token: None,
        }
    }
}

/// A wake that has been handed to a background task.
///
/// HTTP handlers drop `task` and answer immediately; the CLI and tests can
/// await it to observe the send result.
#[derive(Debug)]
pub struct WakeDispatch {
    /// Target MAC as configured.
    pub mac: String,
    pub task: JoinHandle<Result<(), SendError>>,
}

/// Shared service state.  Wrap in an `Arc` and hand one clone to each request.
pub struct ControlService {
    config: RwLock<WolConfig>,
    store: Arc<dyn ConfigStore>,
    sender: Arc<dyn PacketSender>,
}

impl ControlService {
    pub fn new(
        config: WolConfig,
        store: Arc<dyn ConfigStore>,
        sender: Arc<dyn PacketSender>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            store,
            sender,
        }
    }

    /// Loads the stored config, repairing values that break an invariant.
    ///
    /// See [`WolConfig::repaired`].  The repaired config is kept in memory and
    /// reaches the store with the next save.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be read.
    pub fn from_store(
        store: Arc<dyn ConfigStore>,
        sender: Arc<dyn PacketSender>,
    ) -> Result<Self, StorageError> {
        let stored = store.load()?;
        if let Err(e) = stored.validate() {
            warn!("stored config is invalid ({e}); repairing it");
        }
        let config = stored.repaired();
        if config != stored {
            info!("stored config repaired; it will be rewritten on the next save");
        }
        Ok(Self::new(config, store, sender))
    }

    /// Returns a copy of the current config.
    pub async fn snapshot(&self) -> WolConfig {
        self.config.read().await.clone()
    }

    /// Returns `true` if `peer` passes the IP allowlist.
    pub async fn allows(&self, peer: IpAddr) -> bool {
        let config = self.config.read().await;
        cidr::is_allowed(peer, &config.ip_allowlist)
    }

    /// Fails with [`ControlError::Unauthorized`] unless the credentials pass.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<(), ControlError> {
        let config = self.config.read().await;
        if is_authenticated(
            &config,
            credentials.bearer.as_deref(),
            credentials.query_token.as_deref(),
        ) {
            Ok(())
        } else {
            warn!("rejected request without a valid token");
            Err(ControlError::Unauthorized)
        }
    }

    /// Returns the configured token if `password` matches.
    ///
    /// The token may be empty when authentication is disabled and no token
    /// was ever generated.
    pub async fn login(&self, password: &str) -> Option<String> {
        let config = self.config.read().await;
        if check_login(&config, password) {
            info!("dashboard login succeeded");
            Some(config.auth_token.clone())
        } else {
            info!("dashboard login failed: wrong password");
            None
        }
    }

    /// Starts sending one magic packet to the configured target.
    ///
    /// Returns as soon as the send task is spawned.  The send outcome is
    /// logged by the task and never reaches the HTTP caller.
    pub async fn wake(&self) -> Result<WakeDispatch, ControlError> {
        let (mac, broadcast, port) = {
            let config = self.config.read().await;
            if !config.has_target() {
                return Err(ControlError::NoTarget);
            }
            (
                config.target_mac_address.clone(),
                config.broadcast_address.clone(),
                config.wol_port,
            )
        };

        let sender = Arc::clone(&self.sender);
        let target = mac.clone();
        let task = tokio::spawn(async move {
            let result = sender.send_magic_packet(&target, &broadcast, port).await;
            match &result {
                Ok(()) => info!("magic packet sent to {target} via {broadcast}:{port}"),
                Err(e) => error!("failed to send magic packet to {target}: {e}"),
            }
            result
        });

        Ok(WakeDispatch { mac, task })
    }

    /// Applies a partial update: validate, persist, then swap.
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<(), ControlError> {
        let mut config = self.config.write().await;
        let next = update.apply_to(&config)?;
        self.persist(&next).await?;
        *config = next;
        info!("configuration updated");
        debug!("updated fields: {:?}", update.present_fields());
        Ok(())
    }

    /// Generates and persists a token if none is configured.
    ///
    /// Returns `true` if a new token was created.
    pub async fn ensure_auth_token(&self) -> Result<bool, ControlError> {
        let mut config = self.config.write().await;
        if !config.auth_token.is_empty() {
            return Ok(false);
        }
        let mut next = config.clone();
        next.auth_token = generate_token();
        self.persist(&next).await?;
        *config = next;
        info!("no API token configured; generated a new one");
        Ok(true)
    }

    /// Writes `config` to the store on the blocking thread pool.
    async fn persist(&self, config: &WolConfig) -> Result<(), StorageError> {
        let store = Arc::clone(&self.store);
        let candidate = config.clone();
        tokio::task::spawn_blocking(move || store.save(&candidate))
            .await
            .map_err(|e| StorageError::Interrupted(e.to_string()))?
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
