//! Remote configuration types.
//!
//! [`RemoteConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup from (in increasing precedence) the defaults
//! below, the optional TOML config file, and CLI flags / environment
//! variables.
//!
//! # Certificate trust
//!
//! The TV's `wss://` endpoint presents a self-signed certificate, so normal
//! TLS validation always fails against it.  [`RemoteConfig::accept_self_signed_certs`]
//! switches validation off **for the control channel only**.  No other
//! network call reads this flag.  The resulting trust model is "whoever
//! answers on this LAN address is the TV": acceptable for a pairing flow on a
//! home network, not for anything routed over the internet.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use tv_remote_core::protocol::endpoint::DEFAULT_CLIENT_NAME;
use tv_remote_core::Transport;

/// Address used when discovery finds nothing and no address was configured.
pub const DEFAULT_TV_HOST: &str = "192.168.1.2";

/// All runtime configuration for one run of the remote.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// TV address used when discovery is disabled or finds nothing.
    pub tv_host: String,
    /// Control-channel transport (`wss://` on 8002 or `ws://` on 8001).
    pub transport: Transport,
    /// Explicit control-channel port; `None` uses the transport's default.
    pub port: Option<u16>,
    /// Client name shown on the TV's pairing prompt.  Tokens are bound to it.
    pub client_name: String,
    /// Deadline for opening the control channel and for reading the handshake.
    pub connect_timeout: Duration,
    /// Trust the TV's self-signed certificate on the control channel.
    pub accept_self_signed_certs: bool,
    /// Deadline for the device info request.
    pub info_timeout: Duration,
    /// SSDP discovery settings.
    pub discovery: DiscoveryConfig,
    /// Minimum delays between commands.
    pub pacing: Pacing,
    /// Where the pairing token is persisted.  `None` keeps it in memory only.
    pub token_file: Option<PathBuf>,
}

impl Default for RemoteConfig {
    /// | Field                    | Default              |
    /// |--------------------------|----------------------|
    /// | tv_host                  | `192.168.1.2`        |
    /// | transport                | `Secure` (wss, 8002) |
    /// | client_name              | `SamsungRemotePOC`   |
    /// | connect_timeout          | 10 seconds           |
    /// | accept_self_signed_certs | `true`               |
    /// | info_timeout             | 5 seconds            |
    fn default() -> Self {
        Self {
            tv_host: DEFAULT_TV_HOST.to_string(),
            transport: Transport::Secure,
            port: None,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            connect_timeout: Duration::from_secs(10),
            accept_self_signed_certs: true,
            info_timeout: Duration::from_secs(5),
            discovery: DiscoveryConfig::default(),
            pacing: Pacing::default(),
            token_file: None,
        }
    }
}

/// SSDP discovery settings.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Skip discovery and go straight to the configured address.
    pub enabled: bool,
    /// Listen window for responses.  Zero returns immediately.
    pub timeout: Duration,
    /// Where the M-SEARCH probe is sent.
    pub probe_addr: SocketAddr,
    /// Case-insensitive substring a response must contain to count.
    pub vendor_marker: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(5),
            probe_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(239, 255, 255, 250)), 1900),
            vendor_marker: "samsung".to_string(),
        }
    }
}

/// Minimum delay after each transmitted command.
///
/// The TV processes remote input as a serial stream and drops or reorders
/// key events that arrive faster than this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Delay after a key press.
    pub key_press: Duration,
    /// Delay after an app launch.
    pub app_launch: Duration,
}

impl Pacing {
    /// No delays at all.  For tests and dry runs.
    pub fn none() -> Self {
        Self {
            key_press: Duration::ZERO,
            app_launch: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            key_press: Duration::from_millis(300),
            app_launch: Duration::from_millis(500),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transport_is_secure() {
        let cfg = RemoteConfig::default();
        assert_eq!(cfg.transport, Transport::Secure);
        assert_eq!(cfg.port, None);
    }

    #[test]
    fn test_default_connect_timeout_is_10s() {
        assert_eq!(RemoteConfig::default().connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_client_name() {
        assert_eq!(RemoteConfig::default().client_name, "SamsungRemotePOC");
    }

    #[test]
    fn test_default_accepts_self_signed_certs() {
        assert!(RemoteConfig::default().accept_self_signed_certs);
    }

    #[test]
    fn test_default_discovery_targets_ssdp_multicast() {
        // Arrange / Act
        let cfg = DiscoveryConfig::default();

        // Assert
        assert!(cfg.enabled);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.probe_addr.to_string(), "239.255.255.250:1900");
        assert_eq!(cfg.vendor_marker, "samsung");
    }

    #[test]
    fn test_default_pacing() {
        let p = Pacing::default();
        assert_eq!(p.key_press, Duration::from_millis(300));
        assert_eq!(p.app_launch, Duration::from_millis(500));
    }

    #[test]
    fn test_pacing_none_is_zero() {
        let p = Pacing::none();
        assert!(p.key_press.is_zero());
        assert!(p.app_launch.is_zero());
    }
}
