//! Infrastructure layer for tv-remote.
//!
//! Everything that touches the network or the file system lives here.
//!
//! # Sub-modules
//!
//! - **`discovery`** – SSDP `M-SEARCH` probe; collects the addresses of
//!   devices whose response mentions Samsung.
//!
//! - **`device_info`** – Best-effort `GET /api/v2/` on the TV's plaintext
//!   port.  Never fails the run.
//!
//! - **`channel`** – The [`channel::ControlChannel`] seam plus its
//!   tokio-tungstenite implementation, including the TLS connector that
//!   trusts the TV's self-signed certificate.
//!
//! - **`session`** – The pairing handshake and session state machine built on
//!   top of a `ControlChannel`.
//!
//! - **`token_store`** – Where the pairing token lives between runs.
//!
//! - **`storage`** – The optional TOML config file.
//!
//! # What does NOT belong here?
//!
//! - Wire payload shapes (that is `tv-remote-core`)
//! - Pacing and command sequences (that is the application layer)

pub mod channel;
pub mod device_info;
pub mod discovery;
pub mod session;
pub mod storage;
pub mod token_store;

pub use discovery::discover;
pub use session::{RemoteSession, SessionError, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
