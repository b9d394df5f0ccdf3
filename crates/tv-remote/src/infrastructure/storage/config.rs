//! TOML-based configuration file for the remote.
//!
//! Reads [`FileConfig`] from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\TvRemote\config.toml`
//! - Linux:    `~/.config/tv-remote/config.toml`
//! - macOS:    `~/Library/Application Support/TvRemote/config.toml`
//!
//! or from the path given with `--config`.
//!
//! # Example
//!
//! ```toml
//! [tv]
//! host = "192.168.1.40"
//! transport = "plain"
//! connect_timeout_secs = 5
//!
//! [discovery]
//! enabled = false
//!
//! [pacing]
//! key_press_ms = 400
//!
//! [token]
//! file = "/home/me/.config/tv-remote/tv_token"
//! ```
//!
//! Every field has a serde default, so an empty file (or no file) yields
//! the same settings as [`RemoteConfig::default`].  CLI flags are applied
//! on top of the result by `main.rs`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tv_remote_core::protocol::endpoint::DEFAULT_CLIENT_NAME;
use tv_remote_core::Transport;

use crate::domain::config::{DiscoveryConfig, Pacing, RemoteConfig, DEFAULT_TV_HOST};

/// File name of the persisted pairing token inside the config directory.
pub const TOKEN_FILE_NAME: &str = "tv_token";

/// Token file used when no platform config directory can be determined.
pub const FALLBACK_TOKEN_FILE: &str = ".tv_token";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub tv: TvSection,
    #[serde(default)]
    pub discovery: DiscoverySection,
    #[serde(default)]
    pub pacing: PacingSection,
    #[serde(default)]
    pub token: TokenSection,
}

/// `[tv]`: how to reach the television.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvSection {
    /// Address used when discovery is off or finds nothing.
    #[serde(default = "default_host")]
    pub host: String,
    /// `"secure"` (wss, 8002) or `"plain"` (ws, 8001).
    #[serde(default)]
    pub transport: Transport,
    /// Port override for the control channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Name shown on the TV's pairing prompt.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    #[serde(default = "default_true")]
    pub accept_self_signed_certs: bool,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_info_timeout_secs")]
    pub info_timeout_secs: u64,
}

/// `[discovery]`: SSDP probe settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverySection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Listen window in seconds.  `0` skips the probe.
    #[serde(default = "default_discovery_timeout_secs")]
    pub timeout_secs: u64,
}

/// `[pacing]`: delays after each command, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingSection {
    #[serde(default = "default_key_press_ms")]
    pub key_press_ms: u64,
    #[serde(default = "default_app_launch_ms")]
    pub app_launch_ms: u64,
}

/// `[token]`: where the pairing token is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenSection {
    /// Token file; absent means `<config dir>/tv_token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    DEFAULT_TV_HOST.to_string()
}
fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}
fn default_true() -> bool {
    true
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_info_timeout_secs() -> u64 {
    5
}
fn default_discovery_timeout_secs() -> u64 {
    5
}
fn default_key_press_ms() -> u64 {
    300
}
fn default_app_launch_ms() -> u64 {
    500
}

impl Default for TvSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            transport: Transport::default(),
            port: None,
            client_name: default_client_name(),
            accept_self_signed_certs: default_true(),
            connect_timeout_secs: default_connect_timeout_secs(),
            info_timeout_secs: default_info_timeout_secs(),
        }
    }
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

impl Default for PacingSection {
    fn default() -> Self {
        Self {
            key_press_ms: default_key_press_ms(),
            app_launch_ms: default_app_launch_ms(),
        }
    }
}

impl FileConfig {
    /// Converts the file schema into the runtime [`RemoteConfig`].
    ///
    /// When the file names no token file, `<config dir>/tv_token` is used
    /// (see [`default_token_path`]).
    pub fn into_remote_config(self) -> RemoteConfig {
        let token_file = self.token.file.or_else(|| Some(default_token_path()));
        RemoteConfig {
            tv_host: self.tv.host,
            transport: self.tv.transport,
            port: self.tv.port,
            client_name: self.tv.client_name,
            connect_timeout: Duration::from_secs(self.tv.connect_timeout_secs),
            accept_self_signed_certs: self.tv.accept_self_signed_certs,
            info_timeout: Duration::from_secs(self.tv.info_timeout_secs),
            discovery: DiscoveryConfig {
                enabled: self.discovery.enabled,
                timeout: Duration::from_secs(self.discovery.timeout_secs),
                ..DiscoveryConfig::default()
            },
            pacing: Pacing {
                key_press: Duration::from_millis(self.pacing.key_press_ms),
                app_launch: Duration::from_millis(self.pacing.app_launch_ms),
            },
            token_file,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Default location of the pairing token file.
///
/// Falls back to `.tv_token` in the working directory on platforms without a
/// config directory.
pub fn default_token_path() -> PathBuf {
    config_dir()
        .map(|dir| dir.join(TOKEN_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(FALLBACK_TOKEN_FILE))
}

/// Loads [`FileConfig`] from `path`, returning `FileConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!("loading config from {}", path.display());
            Ok(toml::from_str(&content)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no config file at {}, using defaults", path.display());
            Ok(FileConfig::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config base directory including the `TvRemote` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TvRemote"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("tv-remote"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("TvRemote"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
