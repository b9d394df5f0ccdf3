//! Domain layer for tv-remote.
//!
//! Pure configuration types with no dependencies on I/O.  The infrastructure
//! layer and `main.rs` are responsible for filling them in from the config
//! file, environment variables, and CLI flags.

pub mod config;

pub use config::{DiscoveryConfig, Pacing, RemoteConfig};
