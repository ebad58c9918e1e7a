//! WOL Server: entry point.
//!
//! Runs the HTTP control service, or performs one-shot maintenance tasks
//! against the same config file.
//!
//! # Usage
//!
//! ```text
//! wol-server [OPTIONS]                  serve the HTTP API and dashboard
//! wol-server wake [--mac ..] [--broadcast ..] [--port ..]
//! wol-server generate-token [--save]
//!
//! Options:
//!   --config <PATH>   Config file [default: platform config dir]
//!   --bind   <IP>     HTTP listener interface [default: 0.0.0.0]
//!   --port   <PORT>   HTTP listener port [default: httpPort from config]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable        | Description                         |
//! |-----------------|-------------------------------------|
//! | `WOL_CONFIG`    | Config file path                    |
//! | `WOL_BIND`      | HTTP listener interface             |
//! | `WOL_HTTP_PORT` | HTTP listener port (not persisted)  |
//! | `RUST_LOG`      | Log filter, e.g. `wol_server=debug` |
//!
//! # Startup sequence
//!
//! 1. Logging is initialised from `RUST_LOG` (default `info`).
//! 2. The config file is loaded; a missing file means defaults and invalid
//!    values are repaired (see `WolConfig::repaired`).
//! 3. If no API token is configured, one is generated and saved.
//! 4. The listener binds and serves until Ctrl+C.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wol_core::{format_mac, generate_token};

use wol_server::application::{ConfigStore, ControlService, PacketSender};
use wol_server::domain::ServerSettings;
use wol_server::infrastructure::{run_server, TomlConfigStore, UdpPacketSender};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wake-on-LAN control server.
#[derive(Debug, Parser)]
#[command(
    name = "wol-server",
    about = "HTTP control service that sends Wake-on-LAN magic packets",
    version,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "WOL_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// IP address to bind the HTTP listener to.
    ///
    /// `0.0.0.0` accepts connections on every interface.
    #[arg(long, default_value = "0.0.0.0", env = "WOL_BIND")]
    bind: String,

    /// HTTP port for this run; the stored `httpPort` is left unchanged.
    #[arg(long, env = "WOL_HTTP_PORT")]
    port: Option<u16>,
}

impl ServeArgs {
    /// Converts the parsed arguments into [`ServerSettings`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not an IP address.
    fn into_settings(self) -> anyhow::Result<ServerSettings> {
        let bind_ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: '{}'", self.bind))?;
        Ok(ServerSettings {
            bind_ip,
            port_override: self.port,
        })
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one magic packet and exit.
    Wake {
        /// Target MAC; defaults to the configured target.
        #[arg(long)]
        mac: Option<String>,

        /// Broadcast address; defaults to the configured one.
        #[arg(long)]
        broadcast: Option<String>,

        /// UDP port; defaults to the configured WOL port.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a new random API token.
    GenerateToken {
        /// Also store the token in the config file.
        #[arg(long)]
        save: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = TomlConfigStore::open(cli.config.as_deref())
        .context("cannot locate config file; pass --config")?;

    match cli.command {
        None => serve(cli.serve.into_settings()?, store).await,
        Some(Command::Wake {
            mac,
            broadcast,
            port,
        }) => wake_once(&store, mac, broadcast, port).await,
        Some(Command::GenerateToken { save }) => print_new_token(&store, save),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn serve(settings: ServerSettings, store: TomlConfigStore) -> anyhow::Result<()> {
    let path = store.path().to_path_buf();
    info!("loading config from {}", path.display());
    let service = Arc::new(
        ControlService::from_store(Arc::new(store), Arc::new(UdpPacketSender))
            .with_context(|| format!("failed to load {}", path.display()))?,
    );
    service
        .ensure_auth_token()
        .await
        .context("failed to store generated API token")?;
    let listen_addr = settings.listen_addr(service.snapshot().await.http_port);

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C; shutting down"),
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    };
    run_server(listen_addr, service, shutdown).await
}

async fn wake_once(
    store: &TomlConfigStore,
    mac: Option<String>,
    broadcast: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let config = store.load().context("failed to load config")?;
    let mac = format_mac(&mac.unwrap_or(config.target_mac_address));
    if mac.is_empty() {
        bail!("no target MAC configured; pass --mac");
    }
    let broadcast = broadcast.unwrap_or(config.broadcast_address);
    let port = port.unwrap_or(config.wol_port);

    UdpPacketSender
        .send_magic_packet(&mac, &broadcast, port)
        .await
        .with_context(|| format!("failed to wake {mac}"))?;
    println!("Magic packet sent to {mac} via {broadcast}:{port}");
    Ok(())
}

fn print_new_token(store: &TomlConfigStore, save: bool) -> anyhow::Result<()> {
    let token = generate_token();
    if save {
        let mut config = store.load().context("failed to load config")?;
        config.auth_token = token.clone();
        store.save(&config).context("failed to save config")?;
        info!("new API token saved to {}", store.path().display());
    }
    println!("{token}");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_subcommand_serves_on_all_interfaces() {
        // Arrange
        let cli = Cli::parse_from(["wol-server"]);

        // Act
        let settings = cli.serve.into_settings().unwrap();

        // Assert
        assert!(cli.command.is_none());
        assert!(settings.bind_ip.is_unspecified());
    }

    #[test]
    fn test_cli_port_flag_overrides_listener_only() {
        let cli = Cli::parse_from(["wol-server", "--bind", "127.0.0.1", "--port", "18085"]);

        let settings = cli.serve.into_settings().unwrap();

        assert_eq!(settings.listen_addr(8085).to_string(), "127.0.0.1:18085");
    }

    #[test]
    fn test_cli_rejects_non_ip_bind() {
        let cli = Cli::parse_from(["wol-server", "--bind", "localhost"]);
        assert!(cli.serve.into_settings().is_err());
    }

    #[test]
    fn test_cli_parses_wake_subcommand() {
        let cli = Cli::parse_from([
            "wol-server",
            "wake",
            "--mac",
            "aa-bb-cc-dd-ee-ff",
            "--port",
            "7",
        ]);

        match cli.command {
            Some(Command::Wake { mac, broadcast, port }) => {
                assert_eq!(mac.as_deref(), Some("aa-bb-cc-dd-ee-ff"));
                assert_eq!(broadcast, None);
                assert_eq!(port, Some(7));
            }
            other => panic!("expected wake subcommand, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "wol-server",
            "generate-token",
            "--save",
            "--config",
            "/tmp/wol.toml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/wol.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::GenerateToken { save: true })
        ));
    }
}
