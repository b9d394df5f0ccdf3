//! Message types for the TV control channel.
//!
//! Two directions, two shapes:
//!
//! ```text
//! Client → TV:  Command  →  OutboundMessage  →  JSON text frame
//! TV → Client:  JSON text frame  →  HandshakeEvent   (first frame only)
//! ```
//!
//! # Outbound JSON
//!
//! Every outbound frame is an object with a `"method"` discriminant and a
//! `"params"` object.  Serde's adjacently tagged representation
//! (`tag = "method", content = "params"`) produces exactly that shape:
//!
//! ```json
//! {"method":"ms.remote.control","params":{"Cmd":"Click","DataOfCmd":"KEY_VOLUP","Option":"false","TypeOfRemote":"SendRemoteKey"}}
//! {"method":"ms.channel.emit","params":{"event":"ed.apps.launch","to":"host","data":{"action_type":"DEEP_LINK","appId":"3201907018807","metaTag":""}}}
//! ```
//!
//! # Inbound handshake
//!
//! The TV speaks first.  Its opening frame carries an `"event"` string that
//! decides whether the client is paired.  [`HandshakeEvent`] is a closed enum
//! so every caller must handle the unauthorized and unrecognised cases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Method name for remote key presses.
pub const METHOD_REMOTE_CONTROL: &str = "ms.remote.control";
/// Method name for channel emits (used for app launch).
pub const METHOD_CHANNEL_EMIT: &str = "ms.channel.emit";
/// Emit event that asks the TV to launch an app.
pub const EVENT_APPS_LAUNCH: &str = "ed.apps.launch";
/// Handshake event sent when the client is authorized.
pub const EVENT_CHANNEL_CONNECT: &str = "ms.channel.connect";
/// Handshake event sent when the user denied (or has not yet accepted) the client.
pub const EVENT_CHANNEL_UNAUTHORIZED: &str = "ms.channel.unauthorized";
/// Default `action_type` for app launches.
pub const DEFAULT_ACTION_TYPE: &str = "DEEP_LINK";

// ── Commands ──────────────────────────────────────────────────────────────────

/// A single command to transmit over an established session.
///
/// Commands carry no identity beyond their payload; build one immediately
/// before dispatching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Simulates one click of a physical remote button.
    KeyPress {
        /// Remote key code, e.g. `KEY_VOLUP`.
        code: String,
    },
    /// Asks the TV to launch an installed app by its Tizen app id.
    LaunchApp {
        /// Vendor app id, e.g. `3201907018807` for Netflix.
        app_id: String,
        /// Launch mode; [`DEFAULT_ACTION_TYPE`] unless the caller overrides it.
        action_type: String,
    },
}

impl Command {
    /// Builds a [`Command::KeyPress`].
    pub fn key(code: impl Into<String>) -> Self {
        Self::KeyPress { code: code.into() }
    }

    /// Builds a [`Command::LaunchApp`] with the default `DEEP_LINK` action type.
    pub fn launch(app_id: impl Into<String>) -> Self {
        Self::launch_with_action(app_id, DEFAULT_ACTION_TYPE)
    }

    /// Builds a [`Command::LaunchApp`] with an explicit action type.
    pub fn launch_with_action(app_id: impl Into<String>, action_type: impl Into<String>) -> Self {
        Self::LaunchApp {
            app_id: app_id.into(),
            action_type: action_type.into(),
        }
    }

    /// Returns `true` for app launches, which need a longer pacing delay.
    pub fn is_app_launch(&self) -> bool {
        matches!(self, Self::LaunchApp { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyPress { code } => write!(f, "key {code}"),
            Self::LaunchApp { app_id, .. } => write!(f, "launch app {app_id}"),
        }
    }
}

// ── Outbound wire messages ────────────────────────────────────────────────────

/// A frame the client sends to the TV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum OutboundMessage {
    /// Remote key press.
    #[serde(rename = "ms.remote.control")]
    RemoteControl(RemoteControlParams),
    /// Channel emit; the only emit this client uses is app launch.
    #[serde(rename = "ms.channel.emit")]
    ChannelEmit(ChannelEmitParams),
}

/// `params` object of a remote key press.
///
/// Field names are PascalCase on the wire; the TV ignores frames that use
/// any other casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteControlParams {
    #[serde(rename = "Cmd")]
    pub cmd: String,
    #[serde(rename = "DataOfCmd")]
    pub data_of_cmd: String,
    /// Always the *string* `"false"`, not a JSON boolean.
    #[serde(rename = "Option")]
    pub option: String,
    #[serde(rename = "TypeOfRemote")]
    pub type_of_remote: String,
}

/// `params` object of a channel emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEmitParams {
    pub event: String,
    pub to: String,
    pub data: AppLaunchData,
}

/// `data` object of an app-launch emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppLaunchData {
    pub action_type: String,
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "metaTag")]
    pub meta_tag: String,
}

impl From<&Command> for OutboundMessage {
    fn from(command: &Command) -> Self {
        match command {
            Command::KeyPress { code } => Self::RemoteControl(RemoteControlParams {
                cmd: "Click".to_string(),
                data_of_cmd: code.clone(),
                option: "false".to_string(),
                type_of_remote: "SendRemoteKey".to_string(),
            }),
            Command::LaunchApp {
                app_id,
                action_type,
            } => Self::ChannelEmit(ChannelEmitParams {
                event: EVENT_APPS_LAUNCH.to_string(),
                to: "host".to_string(),
                data: AppLaunchData {
                    action_type: action_type.clone(),
                    app_id: app_id.clone(),
                    meta_tag: String::new(),
                },
            }),
        }
    }
}

// ── Inbound handshake ─────────────────────────────────────────────────────────

/// The TV's opening event on a freshly opened control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeEvent {
    /// The client is authorized.  A token, when present, replaces any stored one.
    Connected {
        /// Freshly issued pairing token.
        token: Option<String>,
    },
    /// The user denied the client, or has not accepted the on-screen prompt.
    Unauthorized,
    /// Any other event.  The session stays usable but is not verified.
    Unrecognized {
        /// The raw `event` string (empty if the field was missing).
        event: String,
    },
}

impl HandshakeEvent {
    /// Maps an `event` string (plus an optional token) onto the closed enum.
    ///
    /// The short forms without the `ms.` prefix are accepted as well.
    pub fn from_event(event: &str, token: Option<String>) -> Self {
        match event {
            EVENT_CHANNEL_CONNECT | "channel.connect" => Self::Connected { token },
            EVENT_CHANNEL_UNAUTHORIZED | "channel.unauthorized" => Self::Unauthorized,
            other => Self::Unrecognized {
                event: other.to_string(),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
