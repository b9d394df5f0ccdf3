//! Control-channel endpoint (URL) construction.
//!
//! The TV accepts remote-control clients at:
//!
//! ```text
//! wss://<ip>:8002/api/v2/channels/samsung.remote.control?name=<base64 name>[&token=<token>]
//! ws://<ip>:8001/api/v2/channels/samsung.remote.control?name=<base64 name>[&token=<token>]
//! ```
//!
//! The client name is shown on the TV's "allow this device?" prompt and the
//! TV binds issued tokens to it, so it must stay stable across runs.  It is
//! base64-encoded so that any name bytes survive the trip through the query
//! string.  Query values are percent-encoded on top of that, so the `+`, `/`
//! and `=` of the base64 alphabet reach a form-decoding server intact.
//! IPv6 hosts are bracketed.

use std::borrow::Cow;
use std::net::Ipv6Addr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::protocol::codec::ProtocolError;

/// Path of the remote-control channel on the TV.
pub const CONTROL_CHANNEL_PATH: &str = "/api/v2/channels/samsung.remote.control";
/// Port of the TLS (`wss://`) control channel.
pub const SECURE_PORT: u16 = 8002;
/// Port of the plaintext (`ws://`) control channel and the device-info endpoint.
pub const PLAIN_PORT: u16 = 8001;
/// Client name announced to the TV.
pub const DEFAULT_CLIENT_NAME: &str = "SamsungRemotePOC";

/// The two control-channel transports the TV offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// `wss://` on port 8002.  Newer TVs only accept this one.
    #[default]
    Secure,
    /// `ws://` on port 8001.
    Plain,
}

impl Transport {
    /// URL scheme for this transport.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Secure => "wss",
            Self::Plain => "ws",
        }
    }

    /// Port the TV listens on for this transport.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Secure => SECURE_PORT,
            Self::Plain => PLAIN_PORT,
        }
    }
}

/// Everything needed to build the control-channel URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEndpoint {
    /// TV address (IP literal or hostname).
    pub host: String,
    /// Encrypted or plaintext transport.
    pub transport: Transport,
    /// Overrides [`Transport::default_port`] when set.
    pub port: Option<u16>,
    /// Client application name, in plain text.
    pub client_name: String,
    /// Pairing token from a previous session, if any.
    pub token: Option<String>,
}

impl ControlEndpoint {
    /// Creates an endpoint on the transport's default port with no token.
    pub fn new(host: impl Into<String>, transport: Transport, client_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            transport,
            port: None,
            client_name: client_name.into(),
            token: None,
        }
    }

    /// Sets an explicit port.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Attaches a pairing token.  Empty tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// The effective port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.transport.default_port())
    }

    /// The host as it appears in the URL authority.
    fn url_host(&self) -> Cow<'_, str> {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            Cow::Owned(format!("[{}]", self.host))
        } else {
            Cow::Borrowed(self.host.as_str())
        }
    }

    /// Everything up to and including the `name` parameter.
    fn url_without_token(&self) -> String {
        format!(
            "{}://{}:{}{}?name={}",
            self.transport.scheme(),
            self.url_host(),
            self.port(),
            CONTROL_CHANNEL_PATH,
            urlencoding::encode(&encode_client_name(&self.client_name)),
        )
    }

    /// The full control-channel URL, token included.
    pub fn url(&self) -> String {
        let mut url = self.url_without_token();
        if let Some(token) = &self.token {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }

    /// The URL with the token shortened, for log output.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url_without_token();
        if let Some(token) = &self.token {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(&token_prefix(token)));
            url.push('…');
        }
        url
    }
}

/// Encodes a client name for the `name` query parameter.
pub fn encode_client_name(name: &str) -> String {
    STANDARD.encode(name.as_bytes())
}

/// Decodes a `name` query parameter back into the raw name bytes.
///
/// Accepts the value as it appears in the URL, percent-encoded or not.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidClientName`] for input that is not valid
/// percent-encoding or not valid base64.
pub fn decode_client_name(encoded: &str) -> Result<Vec<u8>, ProtocolError> {
    let unescaped =
        urlencoding::decode(encoded).map_err(|e| ProtocolError::InvalidClientName(e.to_string()))?;
    STANDARD
        .decode(unescaped.as_bytes())
        .map_err(|e| ProtocolError::InvalidClientName(e.to_string()))
}

/// First few characters of a token, safe to log.
pub fn token_prefix(token: &str) -> String {
    token.chars().take(6).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Pulls the `name` query value out of a URL.
    fn name_param(url: &str) -> &str {
        let query = url.split_once('?').unwrap().1;
        query
            .split('&')
            .find_map(|kv| kv.strip_prefix("name="))
            .unwrap()
    }

    #[test]
    fn test_transport_defaults() {
        assert_eq!(Transport::default(), Transport::Secure);
        assert_eq!(Transport::Secure.scheme(), "wss");
        assert_eq!(Transport::Secure.default_port(), 8002);
        assert_eq!(Transport::Plain.scheme(), "ws");
        assert_eq!(Transport::Plain.default_port(), 8001);
    }

    #[test]
    fn test_secure_url_without_token() {
        // Arrange
        let ep = ControlEndpoint::new("192.168.1.2", Transport::Secure, "SamsungRemotePOC");

        // Act
        let url = ep.url();

        // Assert
        assert_eq!(
            url,
            "wss://192.168.1.2:8002/api/v2/channels/samsung.remote.control?name=U2Ftc3VuZ1JlbW90ZVBPQw%3D%3D"
        );
    }

    #[test]
    fn test_plain_url_with_token() {
        let ep = ControlEndpoint::new("10.0.0.7", Transport::Plain, "SamsungRemotePOC")
            .with_token(Some("11223344".to_string()));

        let url = ep.url();

        assert!(url.starts_with("ws://10.0.0.7:8001/api/v2/channels/samsung.remote.control?name="));
        assert!(url.ends_with("&token=11223344"));
    }

    #[test]
    fn test_port_override() {
        let ep = ControlEndpoint::new("127.0.0.1", Transport::Plain, "x").with_port(Some(9001));
        assert_eq!(ep.port(), 9001);
        assert!(ep.url().starts_with("ws://127.0.0.1:9001/"));
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let link_local = ControlEndpoint::new("fe80::1", Transport::Plain, "x");
        let loopback = ControlEndpoint::new("::1", Transport::Secure, "x").with_port(Some(9002));

        assert!(link_local
            .url()
            .starts_with("ws://[fe80::1]:8001/api/v2/channels/samsung.remote.control?name="));
        assert!(loopback.url().starts_with("wss://[::1]:9002/"));
        assert!(loopback.redacted_url().starts_with("wss://[::1]:9002/"));
    }

    #[test]
    fn test_ipv4_and_hostnames_are_not_bracketed() {
        assert!(ControlEndpoint::new("10.0.0.7", Transport::Plain, "x")
            .url()
            .starts_with("ws://10.0.0.7:8001/"));
        assert!(ControlEndpoint::new("tv.local", Transport::Secure, "x")
            .url()
            .starts_with("wss://tv.local:8002/"));
    }

    #[test]
    fn test_query_values_are_percent_encoded() {
        // Arrange: "??>" encodes to "Pz8+", and the token carries reserved characters
        let ep = ControlEndpoint::new("h", Transport::Secure, "??>")
            .with_token(Some("a+b/c=d&e".to_string()));

        // Act
        let url = ep.url();

        // Assert
        let query = url.split_once('?').unwrap().1;
        assert_eq!(query, "name=Pz8%2B&token=a%2Bb%2Fc%3Dd%26e");
        assert_eq!(decode_client_name(name_param(&url)).unwrap(), b"??>");
    }

    #[test]
    fn test_decode_client_name_accepts_unescaped_value() {
        assert_eq!(decode_client_name("U2Ftc3VuZ1JlbW90ZVBPQw==").unwrap(), b"SamsungRemotePOC");
        assert_eq!(decode_client_name("U2Ftc3VuZ1JlbW90ZVBPQw%3D%3D").unwrap(), b"SamsungRemotePOC");
    }

    #[test]
    fn test_empty_token_is_not_attached() {
        let ep = ControlEndpoint::new("h", Transport::Secure, "x").with_token(Some(String::new()));
        assert_eq!(ep.token, None);
        assert!(!ep.url().contains("token="));
    }

    #[test]
    fn test_client_name_round_trips_through_url() {
        // Arrange: names with spaces, non-ASCII, and URL-significant characters
        for name in ["SamsungRemotePOC", "Living room remote", "télécommande ✓", "a&b=c?d", ""] {
            let ep = ControlEndpoint::new("192.168.1.2", Transport::Secure, name);

            // Act
            let decoded = decode_client_name(name_param(&ep.url())).unwrap();

            // Assert
            assert_eq!(decoded, name.as_bytes(), "name {name:?} must round-trip");
        }
    }

    #[test]
    fn test_decode_client_name_rejects_garbage() {
        assert!(matches!(
            decode_client_name("@@not base64@@"),
            Err(ProtocolError::InvalidClientName(_))
        ));
    }

    #[test]
    fn test_redacted_url_hides_full_token() {
        let ep = ControlEndpoint::new("h", Transport::Secure, "x")
            .with_token(Some("abcdefghijklmnop".to_string()));

        let redacted = ep.redacted_url();

        assert!(redacted.contains("token=abcdef…"));
        assert!(!redacted.contains("abcdefghijklmnop"));
    }

    #[test]
    fn test_token_prefix_handles_short_tokens() {
        assert_eq!(token_prefix("abc"), "abc");
        assert_eq!(token_prefix("1234567890"), "123456");
    }
}
