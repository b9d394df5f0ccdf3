//! WebSocket control channel on tokio-tungstenite.
//!
//! # Certificate trust (read this before changing anything here)
//!
//! The TV serves `wss://` on port 8002 with a self-signed certificate issued
//! to no hostname in particular.  Standard validation therefore always fails.
//! When `accept_self_signed` is `true`, [`build_tls_connector`] turns off
//! **both** certificate-chain and hostname verification for this connector.
//!
//! That is a deliberate LAN-only trust model: anything that answers on the
//! TV's address is trusted.  The connector is built here and handed straight
//! to tokio-tungstenite; it is never shared with other clients (the device
//! info fetch uses its own plain-HTTP client).
//!
//! # Frames
//!
//! The TV only sends text frames carrying JSON.  Binary frames are converted
//! lossily to text; ping/pong frames are skipped (tungstenite answers pings
//! on its own).

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async_tls_with_config,
    tungstenite::{Error as WsError, Message as WsMessage},
    Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};
use tv_remote_core::{ControlEndpoint, Transport};

use super::{ChannelError, ControlChannel};

/// A control channel backed by a real WebSocket.
pub struct WsControlChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

/// Builds the TLS connector for the `wss://` control channel.
///
/// # Errors
///
/// Returns the native-tls error if the platform TLS backend cannot be initialised.
pub fn build_tls_connector(accept_self_signed: bool) -> Result<native_tls::TlsConnector, native_tls::Error> {
    let mut builder = native_tls::TlsConnector::builder();
    if accept_self_signed {
        warn!("TLS certificate and hostname verification disabled for the TV control channel (LAN trust)");
        builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }
    builder.build()
}

/// Opens the control channel described by `endpoint`.
///
/// `accept_self_signed` only matters for [`Transport::Secure`].  The whole
/// open (TCP connect, TLS handshake, HTTP upgrade) must finish within
/// `timeout`.
///
/// # Errors
///
/// Returns [`ChannelError::Timeout`] when the deadline passes, and
/// [`ChannelError::WebSocket`] / [`ChannelError::Tls`] for every other failure.
pub async fn open_control_channel(
    endpoint: &ControlEndpoint,
    accept_self_signed: bool,
    timeout: Duration,
) -> Result<WsControlChannel, ChannelError> {
    let connector = match endpoint.transport {
        Transport::Secure => Connector::NativeTls(build_tls_connector(accept_self_signed)?),
        Transport::Plain => Connector::Plain,
    };

    debug!("opening control channel {}", endpoint.redacted_url());

    let connect = connect_async_tls_with_config(endpoint.url(), None, false, Some(connector));
    let (stream, response) = tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| ChannelError::Timeout(timeout))??;

    debug!("control channel upgraded (HTTP {})", response.status());
    Ok(WsControlChannel { stream })
}

#[async_trait]
impl ControlChannel for WsControlChannel {
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        match self.stream.send(WsMessage::Text(text)).await {
            Ok(()) => Ok(()),
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Err(ChannelError::Closed),
            Err(e) => Err(e.into()),
        }
    }

    async fn recv_text(&mut self) -> Result<Option<String>, ChannelError> {
        while let Some(frame) = self.stream.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => return Ok(Some(text)),
                Ok(WsMessage::Binary(bytes)) => {
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
                }
                Ok(WsMessage::Close(frame)) => {
                    debug!("TV closed the control channel: {frame:?}");
                    return Ok(None);
                }
                Ok(_) => continue,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
