//! Session manager: opening the control channel and the pairing handshake.
//!
//! # State machine
//!
//! ```text
//!  Disconnected ──open──▶ Connecting ──socket up──▶ AwaitingHandshake
//!        ▲                    │                          │
//!        └──ConnectFailure────┘                          │ first frame
//!                                      ┌─────────────────┼──────────────────┐
//!                                      ▼                 ▼                  ▼
//!                                 Established       Established          Rejected
//!                                  (verified)       (unverified)        (terminal)
//!                                      │                 │
//!                                      └──── close ──────┴──▶ Closed (terminal)
//! ```
//!
//! # What the TV's first frame means
//!
//! | Event                     | Result                                              |
//! |---------------------------|-----------------------------------------------------|
//! | `ms.channel.connect`      | Established.  A `data.token` overwrites the stored one. |
//! | `ms.channel.unauthorized` | Rejected → [`SessionError::PairingRejected`].       |
//! | anything else             | Established but unverified; event reported.         |
//! | nothing before timeout    | Established but unverified; reason reported.        |
//!
//! The TV may issue a fresh token on any connect, which invalidates the old
//! one, so a token in a `connect` event is always saved even if one was
//! already stored.
//!
//! # Ownership
//!
//! A [`RemoteSession`] owns its channel.  It is not shared, pooled, or
//! multiplexed; once closed (or rejected) it refuses every further command.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tv_remote_core::protocol::endpoint::token_prefix;
use tv_remote_core::{decode_handshake, encode_command, Command, ControlEndpoint, HandshakeEvent, ProtocolError, Transport};

use crate::domain::config::RemoteConfig;
use crate::infrastructure::channel::{open_control_channel, ChannelError, ControlChannel};
use crate::infrastructure::token_store::TokenStore;

/// Lifecycle states of a [`RemoteSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No channel.
    Disconnected,
    /// Opening the socket.
    Connecting,
    /// Socket open, waiting for the TV's first frame.
    AwaitingHandshake,
    /// Commands may be sent.
    Established,
    /// The TV refused this client.  Terminal.
    Rejected,
    /// Closed by the caller.  Terminal.
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingHandshake => "awaiting handshake",
            Self::Established => "established",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// How an established session came to be established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// The TV sent `ms.channel.connect`.
    Verified,
    /// The TV sent something else, or nothing; the session is usable but unconfirmed.
    Unverified {
        /// Human-readable diagnostic (the unexpected event, or why no event was read).
        reason: String,
    },
}

/// Errors surfaced by the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The control channel could not be opened.  Not retried.
    #[error("failed to connect to TV at {url}: {source}")]
    ConnectFailure {
        /// Control-channel URL with the token redacted.
        url: String,
        #[source]
        source: ChannelError,
    },

    /// The TV answered `ms.channel.unauthorized`.
    #[error("pairing denied: accept the connection on the television")]
    PairingRejected,

    /// A command was attempted outside the `Established` state.
    #[error("session is {0}, commands cannot be sent")]
    NotEstablished(SessionState),

    /// The command could not be encoded.
    #[error("failed to encode command: {0}")]
    Encode(#[from] ProtocolError),

    /// The frame could not be written to the channel.
    #[error("failed to transmit frame: {0}")]
    Transmit(#[source] ChannelError),
}

/// One control session with one TV.
pub struct RemoteSession {
    id: Uuid,
    transport: Transport,
    state: SessionState,
    channel: Option<Box<dyn ControlChannel>>,
    token: Option<String>,
    outcome: Option<HandshakeOutcome>,
}

impl fmt::Debug for RemoteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSession")
            .field("id", &self.id)
            .field("transport", &self.transport)
            .field("state", &self.state)
            .field("has_token", &self.token.is_some())
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl RemoteSession {
    /// Opens the control channel to `host` and completes the handshake.
    ///
    /// The stored token (if any) is attached to the URL; a token issued by the
    /// TV is written back to `store`.  Token store failures are logged and
    /// never abort the connect.
    ///
    /// # Errors
    ///
    /// - [`SessionError::ConnectFailure`] if the socket cannot be opened within
    ///   `config.connect_timeout` (refused, unreachable, TLS failure, timeout).
    /// - [`SessionError::PairingRejected`] if the TV refuses this client.
    pub async fn connect(
        config: &RemoteConfig,
        host: &str,
        store: &dyn TokenStore,
    ) -> Result<Self, SessionError> {
        let mut session = Self::disconnected(config.transport);

        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("session {}: could not load pairing token: {e}", session.id);
                None
            }
        };

        let endpoint = ControlEndpoint::new(host, config.transport, config.client_name.clone())
            .with_port(config.port)
            .with_token(token.clone());

        session.transition(SessionState::Connecting);
        info!(
            "session {}: connecting to TV at {host}:{}",
            session.id,
            endpoint.port()
        );
        debug!("session {}: URL {}", session.id, endpoint.redacted_url());

        let channel = match open_control_channel(
            &endpoint,
            config.accept_self_signed_certs,
            config.connect_timeout,
        )
        .await
        {
            Ok(channel) => channel,
            Err(source) => {
                session.transition(SessionState::Disconnected);
                return Err(SessionError::ConnectFailure {
                    url: endpoint.redacted_url(),
                    source,
                });
            }
        };
        info!("session {}: WebSocket connected", session.id);

        session.attach(Box::new(channel), token);
        session.complete_handshake(store, config.connect_timeout).await?;
        Ok(session)
    }

    /// Wraps an already open channel.  The session starts in `AwaitingHandshake`.
    pub fn from_channel(
        channel: Box<dyn ControlChannel>,
        transport: Transport,
        token: Option<String>,
    ) -> Self {
        let mut session = Self::disconnected(transport);
        session.attach(channel, token);
        session
    }

    fn disconnected(transport: Transport) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            state: SessionState::Disconnected,
            channel: None,
            token: None,
            outcome: None,
        }
    }

    fn attach(&mut self, channel: Box<dyn ControlChannel>, token: Option<String>) {
        self.channel = Some(channel);
        self.token = token;
        self.transition(SessionState::AwaitingHandshake);
    }

    fn transition(&mut self, to: SessionState) {
        debug!("session {}: {} -> {}", self.id, self.state, to);
        self.state = to;
    }

    /// Reads the TV's first frame and acts on it.
    ///
    /// Waits at most `timeout` for the frame.
    ///
    /// # Errors
    ///
    /// - [`SessionError::PairingRejected`] on `ms.channel.unauthorized`; the
    ///   session moves to `Rejected` and its channel is closed.
    /// - [`SessionError::NotEstablished`] if called outside `AwaitingHandshake`.
    pub async fn complete_handshake(
        &mut self,
        store: &dyn TokenStore,
        timeout: Duration,
    ) -> Result<&HandshakeOutcome, SessionError> {
        if self.state != SessionState::AwaitingHandshake {
            return Err(SessionError::NotEstablished(self.state));
        }
        let Some(channel) = self.channel.as_mut() else {
            return Err(SessionError::NotEstablished(self.state));
        };

        let event = match tokio::time::timeout(timeout, channel.recv_text()).await {
            Ok(Ok(Some(text))) => {
                debug!("session {}: handshake frame {text}", self.id);
                decode_handshake(&text).map_err(|e| format!("unreadable handshake frame: {e}"))
            }
            Ok(Ok(None)) => Err("channel closed before the handshake event".to_string()),
            Ok(Err(e)) => Err(format!("error reading handshake: {e}")),
            Err(_) => Err(format!("no handshake event within {timeout:?}")),
        };

        let outcome = match event {
            Ok(HandshakeEvent::Connected { token }) => {
                info!("session {}: connected to TV", self.id);
                if let Some(token) = token {
                    self.store_token(store, token);
                }
                HandshakeOutcome::Verified
            }
            Ok(HandshakeEvent::Unauthorized) => {
                warn!("session {}: connection denied; accept the client on the TV", self.id);
                self.transition(SessionState::Rejected);
                if let Some(mut channel) = self.channel.take() {
                    if let Err(e) = channel.close().await {
                        debug!("session {}: close after rejection failed: {e}", self.id);
                    }
                }
                return Err(SessionError::PairingRejected);
            }
            Ok(HandshakeEvent::Unrecognized { event }) => {
                warn!("session {}: unexpected handshake event {event:?}", self.id);
                HandshakeOutcome::Unverified {
                    reason: format!("unexpected event {event:?}"),
                }
            }
            Err(reason) => {
                warn!("session {}: {reason}", self.id);
                HandshakeOutcome::Unverified { reason }
            }
        };

        self.transition(SessionState::Established);
        Ok(&*self.outcome.insert(outcome))
    }

    fn store_token(&mut self, store: &dyn TokenStore, token: String) {
        info!("session {}: received new token {}…", self.id, token_prefix(&token));
        if let Err(e) = store.save(&token) {
            warn!("session {}: could not persist pairing token: {e}", self.id);
        }
        self.token = Some(token);
    }

    /// Encodes `command` and transmits it as one frame.
    ///
    /// No pacing happens here; see the application-layer dispatcher.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotEstablished`] outside the `Established` state.
    /// - [`SessionError::Transmit`] if the channel write fails.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), SessionError> {
        if self.state != SessionState::Established {
            return Err(SessionError::NotEstablished(self.state));
        }
        let Some(channel) = self.channel.as_mut() else {
            return Err(SessionError::NotEstablished(self.state));
        };

        let frame = encode_command(command)?;
        channel.send_text(frame).await.map_err(SessionError::Transmit)?;
        debug!("session {}: sent {command}", self.id);
        Ok(())
    }

    /// Closes the channel.  The session cannot be used afterwards.
    pub async fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                debug!("session {}: close failed: {e}", self.id);
            }
        }
        if self.state != SessionState::Rejected {
            self.transition(SessionState::Closed);
        }
        info!("session {}: disconnected", self.id);
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The token this session is authorized with, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// How the handshake went, once it has happened.
    pub fn handshake_outcome(&self) -> Option<&HandshakeOutcome> {
        self.outcome.as_ref()
    }

    /// Negotiated transport.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Log correlation id.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
