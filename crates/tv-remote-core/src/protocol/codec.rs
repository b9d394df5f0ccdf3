//! JSON codec for control-channel frames.
//!
//! Outbound: [`Command`] → [`OutboundMessage`] → JSON text.
//! Inbound:  JSON text → [`HandshakeEvent`].
//!
//! The handshake decoder is lenient on purpose in one respect only: a
//! well-formed JSON object with a missing or unknown `event` decodes to
//! [`HandshakeEvent::Unrecognized`] instead of failing, because the caller
//! keeps such sessions usable.  Text that is not a JSON object is an error.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::protocol::messages::{Command, HandshakeEvent, OutboundMessage};

/// Errors that can occur while encoding or decoding control-channel frames.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The outbound message could not be serialized.
    #[error("failed to serialize frame: {0}")]
    Serialize(String),

    /// The inbound frame is not a JSON object.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// The base64 client name embedded in a URL could not be decoded.
    #[error("invalid base64 client name: {0}")]
    InvalidClientName(String),
}

/// Shape of the TV's handshake frame.  Only the fields we act on are read.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    event: String,
    #[serde(default)]
    data: Option<Value>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`Command`] as the JSON text frame the TV expects.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] if serde fails (not expected for the
/// plain string payloads used here).
///
/// # Examples
///
/// ```rust
/// use tv_remote_core::{encode_command, Command};
///
/// let frame = encode_command(&Command::key("KEY_VOLUP")).unwrap();
/// assert!(frame.contains("\"DataOfCmd\":\"KEY_VOLUP\""));
/// ```
pub fn encode_command(command: &Command) -> Result<String, ProtocolError> {
    let msg = OutboundMessage::from(command);
    serde_json::to_string(&msg).map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Decodes the TV's first frame into a [`HandshakeEvent`].
///
/// The pairing token is read from `data.token` when it is a non-empty string.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedFrame`] if `text` is not a JSON object.
pub fn decode_handshake(text: &str) -> Result<HandshakeEvent, ProtocolError> {
    let raw: RawEvent =
        serde_json::from_str(text).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;

    let token = raw
        .data
        .as_ref()
        .and_then(|data| data.get("token"))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let event = HandshakeEvent::from_event(&raw.event, token);
    debug!("decoded handshake event {:?}", raw.event);
    Ok(event)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── encode_command ────────────────────────────────────────────────────────

    #[test]
    fn test_encode_key_press_matches_wire_format() {
        // Arrange
        let cmd = Command::key("KEY_VOLUP");

        // Act
        let frame = encode_command(&cmd).unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();

        // Assert
        assert_eq!(json["method"], "ms.remote.control");
        assert_eq!(json["params"]["Cmd"], "Click");
        assert_eq!(json["params"]["DataOfCmd"], "KEY_VOLUP");
        assert_eq!(json["params"]["Option"], "false");
        assert_eq!(json["params"]["TypeOfRemote"], "SendRemoteKey");
    }

    #[test]
    fn test_encode_key_press_has_exactly_four_params() {
        let frame = encode_command(&Command::key("KEY_HOME")).unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["params"].as_object().unwrap().len(), 4);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_encode_launch_app_matches_wire_format() {
        // Arrange
        let cmd = Command::launch("3201907018807");

        // Act
        let frame = encode_command(&cmd).unwrap();
        let json: Value = serde_json::from_str(&frame).unwrap();

        // Assert
        assert_eq!(json["method"], "ms.channel.emit");
        assert_eq!(json["params"]["event"], "ed.apps.launch");
        assert_eq!(json["params"]["to"], "host");
        assert_eq!(json["params"]["data"]["action_type"], "DEEP_LINK");
        assert_eq!(json["params"]["data"]["appId"], "3201907018807");
        assert_eq!(json["params"]["data"]["metaTag"], "");
    }

    #[test]
    fn test_encode_option_is_string_not_bool() {
        let frame = encode_command(&Command::key("KEY_1")).unwrap();
        assert!(frame.contains("\"Option\":\"false\""));
    }

    // ── decode_handshake ──────────────────────────────────────────────────────

    #[test]
    fn test_decode_connect_with_token() {
        // Arrange: shape of a real ms.channel.connect frame
        let text = r#"{"event":"ms.channel.connect","data":{"clients":[],"id":"abc","token":"12345678"}}"#;

        // Act
        let event = decode_handshake(text).unwrap();

        // Assert
        assert_eq!(
            event,
            HandshakeEvent::Connected {
                token: Some("12345678".to_string())
            }
        );
    }

    #[test]
    fn test_decode_connect_without_token() {
        let text = r#"{"event":"ms.channel.connect","data":{"clients":[]}}"#;
        assert_eq!(
            decode_handshake(text).unwrap(),
            HandshakeEvent::Connected { token: None }
        );
    }

    #[test]
    fn test_decode_connect_with_empty_token_treated_as_absent() {
        let text = r#"{"event":"channel.connect","data":{"token":""}}"#;
        assert_eq!(
            decode_handshake(text).unwrap(),
            HandshakeEvent::Connected { token: None }
        );
    }

    #[test]
    fn test_decode_connect_with_non_string_token_treated_as_absent() {
        let text = r#"{"event":"ms.channel.connect","data":{"token":42}}"#;
        assert_eq!(
            decode_handshake(text).unwrap(),
            HandshakeEvent::Connected { token: None }
        );
    }

    #[test]
    fn test_decode_unauthorized() {
        let text = r#"{"event":"ms.channel.unauthorized"}"#;
        assert_eq!(decode_handshake(text).unwrap(), HandshakeEvent::Unauthorized);
    }

    #[test]
    fn test_decode_unknown_event_is_unrecognized() {
        let text = r#"{"event":"ms.channel.clientConnect","data":{}}"#;
        assert_eq!(
            decode_handshake(text).unwrap(),
            HandshakeEvent::Unrecognized {
                event: "ms.channel.clientConnect".to_string()
            }
        );
    }

    #[test]
    fn test_decode_missing_event_is_unrecognized_with_empty_name() {
        let text = r#"{"data":{"token":"x"}}"#;
        assert_eq!(
            decode_handshake(text).unwrap(),
            HandshakeEvent::Unrecognized {
                event: String::new()
            }
        );
    }

    #[test]
    fn test_decode_non_json_returns_malformed_frame() {
        // Arrange
        let text = "not json at all";

        // Act
        let result = decode_handshake(text);

        // Assert
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }
}
