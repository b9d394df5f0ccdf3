//! Storage infrastructure: the optional configuration file.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory (or an explicit path), fills absent fields with defaults, and
//! turns the result into a [`crate::domain::RemoteConfig`].  A missing file
//! is not an error; the remote works with no file at all.

pub mod config;

pub use config::{config_file_path, default_token_path, load_config, ConfigError, FileConfig};
