//! The control channel: a persistent, message-framed connection to the TV.
//!
//! [`ControlChannel`] is the seam between the session state machine and the
//! socket.  The session only ever needs three things from a channel: send one
//! text frame, receive one text frame, close.  Keeping it that small lets the
//! handshake and dispatch logic run against [`mock::MockControlChannel`] in
//! tests without a TV or a WebSocket server.
//!
//! - **`ws`** – The real implementation on tokio-tungstenite, for both
//!   `ws://` and `wss://`.
//! - **`mock`** – In-memory implementation that records sent frames.

pub mod mock;
pub mod ws;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use ws::{build_tls_connector, open_control_channel, WsControlChannel};

/// Errors raised by a control channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// WebSocket protocol or transport failure (refused, reset, bad upgrade, TLS).
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The TLS connector could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    /// The operation did not finish before its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The channel is already closed.
    #[error("channel closed")]
    Closed,
}

/// One open connection to the TV's control channel.
#[async_trait]
pub trait ControlChannel: Send {
    /// Sends one text frame.
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError>;

    /// Receives the next text frame.  `Ok(None)` means the peer closed the channel.
    async fn recv_text(&mut self) -> Result<Option<String>, ChannelError>;

    /// Closes the channel.  Closing an already closed channel is not an error.
    async fn close(&mut self) -> Result<(), ChannelError>;
}
