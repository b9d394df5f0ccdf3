//! tv-remote library crate.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! main.rs (CLI)
//!         ↓
//! [tv-remote]
//!   ├── domain/           RemoteConfig, DiscoveryConfig, Pacing (no I/O)
//!   ├── application/      CommandDispatcher, OTT validation, dry run
//!   └── infrastructure/
//!         ├── discovery/    SSDP M-SEARCH probe (UDP multicast)
//!         ├── device_info/  GET http://<tv>:8001/api/v2/
//!         ├── channel/      WebSocket control channel (tokio-tungstenite)
//!         ├── session/      Pairing handshake and session state machine
//!         ├── token_store/  Pairing token persistence
//!         └── storage/      TOML config file
//! ```
//!
//! # Flow (for beginners)
//!
//! 1. Discovery finds TVs on the LAN (optional; a configured address is the fallback).
//! 2. The device info fetch prints what the TV says about itself (optional).
//! 3. The session manager opens the control channel and reads the TV's
//!    handshake event.  The first time, the TV shows an "allow?" prompt and
//!    issues a token; later runs present that token to skip the prompt.
//! 4. The dispatcher sends key presses and app launches, one at a time, with
//!    a pause after each so the TV does not drop input.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: command dispatch and the canned command sequences.
pub mod application;

/// Infrastructure layer: sockets, HTTP, files.
pub mod infrastructure;
