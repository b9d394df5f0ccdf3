//! # tv-remote-core
//!
//! Shared library for the Samsung TV remote containing the control-channel
//! message types, the JSON codec, the handshake event model, and the app-id
//! and key-name tables.
//!
//! This crate has zero dependencies on sockets, files, or async runtimes.
//! Everything in it can be exercised with plain unit tests.
//!
//! # Architecture overview (for beginners)
//!
//! A Samsung Smart TV exposes a WebSocket "control channel" on the LAN.  A
//! remote-control client opens that channel, waits for the TV's handshake
//! event, and then sends small JSON messages that simulate key presses or ask
//! the TV to launch an app.
//!
//! This crate defines:
//!
//! - **`protocol`** – What travels over the control channel: the outbound
//!   command payloads, the inbound handshake events, and the URL used to open
//!   the channel (including the base64-encoded client name and pairing token).
//!
//! - **`domain`** – The `Device` record describing a TV, parsed from the TV's
//!   plaintext status endpoint.
//!
//! - **`apps`** – Translation tables: human app names (`netflix`) to Tizen app
//!   ids, and free-form key names (`volup`) to remote key codes (`KEY_VOLUP`).

pub mod apps;
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tv_remote_core::Command` instead of `tv_remote_core::protocol::messages::Command`.
pub use apps::{normalize_key_name, resolve_app_id};
pub use domain::device::Device;
pub use protocol::codec::{decode_handshake, encode_command, ProtocolError};
pub use protocol::endpoint::{ControlEndpoint, Transport};
pub use protocol::messages::{Command, HandshakeEvent};
