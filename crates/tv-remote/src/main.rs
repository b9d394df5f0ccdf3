//! Samsung Smart TV LAN remote: entry point.
//!
//! Finds a TV on the local network, prints what it says about itself, pairs
//! with it over the WebSocket control channel, and sends remote key presses
//! or app launches.
//!
//! # Usage
//!
//! ```text
//! tv-remote [OPTIONS] [KEYS]...
//!
//! Commands (pick one; none runs the volume test):
//!   [KEYS]...              Keys to press, e.g. `volup mute KEY_HOME`
//!   --ott                  Run the OTT validation sequence
//!   --launch <NAME|ID>     Launch one app (netflix, youtube, spotify, or a Tizen app id)
//!   --dry-run              Print the OTT payloads and exit; no network
//!
//! Options:
//!   --tv-ip <ADDR>             Fallback TV address [env: TV_IP] [default: 192.168.1.2]
//!   --port <PORT>              Control-channel port override
//!   --plain                    Use ws:// on 8001 instead of wss:// on 8002
//!   --no-discovery             Skip the SSDP probe
//!   --discovery-timeout <SECS> SSDP listen window [default: 5]
//!   --connect-timeout <SECS>   Control-channel deadline [default: 10]
//!   --token-file <PATH>        Where the pairing token is kept
//!   --config <PATH>            TOML config file
//! ```
//!
//! # Settings precedence
//!
//! Built-in defaults < config file < environment variables / CLI flags.
//!
//! # Exit codes
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Commands were dispatched (individual failures are logged) |
//! | 1    | No session could be established, or bad configuration    |

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tv_remote::application::dispatch::CommandDispatcher;
use tv_remote::application::{dry_run, sequences, Step};
use tv_remote::domain::RemoteConfig;
use tv_remote::infrastructure::device_info::fetch_device_info;
use tv_remote::infrastructure::storage::{self, FileConfig};
use tv_remote::infrastructure::{
    discover, FileTokenStore, MemoryTokenStore, RemoteSession, SessionError, TokenStore,
};
use tv_remote_core::Transport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Samsung Smart TV LAN remote.
///
/// Discovers the TV, pairs with it, and sends key presses or app launches.
#[derive(Debug, Parser)]
#[command(
    name = "tv-remote",
    about = "Control a Samsung Smart TV over the local network",
    version
)]
struct Cli {
    /// Remote keys to press, in order.  `volup` is sent as `KEY_VOLUP`.
    #[arg(value_name = "KEYS")]
    keys: Vec<String>,

    /// Run the OTT validation sequence (app keys, then app launches).
    #[arg(long, conflicts_with_all = ["launch", "keys"])]
    ott: bool,

    /// Launch one app by name (netflix, youtube, spotify) or by Tizen app id.
    #[arg(long, value_name = "NAME|ID", conflicts_with = "keys")]
    launch: Option<String>,

    /// Print the OTT payloads without connecting to anything.
    #[arg(long)]
    dry_run: bool,

    /// TV address used when discovery is disabled or finds nothing.
    #[arg(long, env = "TV_IP")]
    tv_ip: Option<String>,

    /// Control-channel port (default: 8002, or 8001 with --plain).
    #[arg(long)]
    port: Option<u16>,

    /// Use the plaintext ws:// transport on port 8001.
    #[arg(long)]
    plain: bool,

    /// Skip SSDP discovery.
    #[arg(long)]
    no_discovery: bool,

    /// SSDP listen window in seconds.  0 skips the probe.
    #[arg(long, value_name = "SECS")]
    discovery_timeout: Option<u64>,

    /// Deadline for opening the control channel and for the handshake, in seconds.
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// File holding the pairing token.
    #[arg(long, value_name = "PATH")]
    token_file: Option<PathBuf>,

    /// TOML config file (default: the platform config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Applies the flags that were given on top of `base`.
    fn apply_to(&self, mut base: RemoteConfig) -> RemoteConfig {
        if let Some(ip) = &self.tv_ip {
            base.tv_host = ip.clone();
        }
        if self.plain {
            base.transport = Transport::Plain;
        }
        if self.port.is_some() {
            base.port = self.port;
        }
        if self.no_discovery {
            base.discovery.enabled = false;
        }
        if let Some(secs) = self.discovery_timeout {
            base.discovery.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.connect_timeout {
            base.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = &self.token_file {
            base.token_file = Some(path.clone());
        }
        base
    }

    /// The command sequence the flags ask for.
    fn steps(&self) -> Vec<Step> {
        if self.ott {
            sequences::ott_validation()
        } else if let Some(app) = &self.launch {
            sequences::launch(app)
        } else if !self.keys.is_empty() {
            sequences::key_presses(&self.keys)
        } else {
            sequences::volume_test()
        }
    }
}

/// Reads the config file named on the command line, or the platform default.
///
/// An explicitly named file must exist; the platform default may be absent.
fn load_file_config(explicit: Option<&PathBuf>) -> anyhow::Result<FileConfig> {
    match explicit {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
            storage::load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => match storage::config_file_path() {
            Ok(path) => storage::load_config(&path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            Err(e) => {
                warn!("{e}; using built-in defaults");
                Ok(FileConfig::default())
            }
        },
    }
}

/// Picks the TV: the first discovered address, else the configured one.
async fn select_host(config: &RemoteConfig) -> String {
    if !config.discovery.enabled {
        info!("discovery disabled, using configured TV address {}", config.tv_host);
        return config.tv_host.clone();
    }

    let found = discover(&config.discovery, |ip| println!("  Found Samsung device: {ip}")).await;
    match found.first() {
        Some(ip) => {
            info!("using discovered TV {ip}");
            ip.to_string()
        }
        None => {
            info!("no TV discovered, using configured TV address {}", config.tv_host);
            config.tv_host.clone()
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. `tracing_subscriber` is initialised; `RUST_LOG` controls the level.
/// 2. CLI arguments are parsed.  `--dry-run` prints the payloads and exits.
/// 3. Settings are assembled: defaults, then the config file, then flags.
/// 4. Discovery → device info → session → commands → close.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.dry_run {
        let payloads = dry_run::ott_payloads().context("failed to encode OTT payloads")?;
        print!("{}", dry_run::render(&payloads));
        return Ok(ExitCode::SUCCESS);
    }

    let file_config = load_file_config(cli.config.as_ref())?;
    let config = cli.apply_to(file_config.into_remote_config());

    // ── Discovery and device info ─────────────────────────────────────────────
    let host = select_host(&config).await;

    match host.parse::<IpAddr>() {
        Ok(ip) => match fetch_device_info(ip, config.info_timeout).await {
            Some(device) => println!("{device}"),
            None => info!("device info unavailable for {ip}"),
        },
        Err(_) => info!("{host} is not an IP address, skipping device info"),
    }

    // ── Session ───────────────────────────────────────────────────────────────
    let store: Box<dyn TokenStore> = match &config.token_file {
        Some(path) => Box::new(FileTokenStore::new(path)),
        None => Box::new(MemoryTokenStore::new()),
    };

    let mut session = match RemoteSession::connect(&config, &host, store.as_ref()).await {
        Ok(session) => session,
        Err(e @ SessionError::PairingRejected) => {
            error!("{e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            error!("could not connect to TV: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(outcome) = session.handshake_outcome() {
        info!("handshake: {outcome:?}");
    }

    // ── Commands ──────────────────────────────────────────────────────────────
    let dispatcher = CommandDispatcher::new(config.pacing);
    let results = sequences::run_steps(&dispatcher, &mut session, &cli.steps()).await;
    for failure in results.iter().filter_map(|r| r.as_ref().err()) {
        warn!("{failure}");
    }

    session.close().await;
    info!("done");
    Ok(ExitCode::SUCCESS)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
