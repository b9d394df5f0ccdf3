//! Dry run: the OTT payloads as they would go over the wire, without a TV.
//!
//! Used to check the JSON shapes in CI or on a machine that is not on the
//! TV's network.  Every payload is produced by the same encoder the live
//! dispatcher uses.

use tv_remote_core::apps::{OTT_APP_IDS, OTT_KEYS};
use tv_remote_core::{encode_command, Command, ProtocolError};

/// One rendered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunPayload {
    /// Human label, e.g. `Key KEY_NETFLIX` or `Launch netflix (3201907018807)`.
    pub label: String,
    /// The exact JSON text frame.
    pub json: String,
}

/// Renders every OTT key payload, then every OTT app-launch payload.
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] if a payload cannot be encoded.
pub fn ott_payloads() -> Result<Vec<DryRunPayload>, ProtocolError> {
    let keys = OTT_KEYS.iter().map(|key| (format!("Key {key}"), Command::key(*key)));
    let launches = OTT_APP_IDS
        .iter()
        .map(|(name, id)| (format!("Launch {name} ({id})"), Command::launch(*id)));

    keys.chain(launches)
        .map(|(label, command)| {
            Ok(DryRunPayload {
                label,
                json: encode_command(&command)?,
            })
        })
        .collect()
}

/// Formats the payloads for the terminal.
pub fn render(payloads: &[DryRunPayload]) -> String {
    let rule = "-".repeat(40);
    let mut out = format!("Dry-run: OTT payloads (no connection)\n{rule}\n");
    for p in payloads {
        out.push_str(&format!("  {}:\n    {}\n", p.label, p.json));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_ott_payloads_cover_keys_then_apps() {
        // Arrange / Act
        let payloads = ott_payloads().unwrap();

        // Assert
        let labels: Vec<&str> = payloads.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Key KEY_NETFLIX",
                "Key KEY_YOUTUBE",
                "Key KEY_APP_LIST",
                "Launch netflix (3201907018807)",
                "Launch youtube (111299001912)",
                "Launch spotify (3201606009684)",
            ]
        );
    }

    #[test]
    fn test_key_payload_shape() {
        let payloads = ott_payloads().unwrap();
        let v: Value = serde_json::from_str(&payloads[0].json).unwrap();

        assert_eq!(v["method"], "ms.remote.control");
        assert_eq!(v["params"]["Cmd"], "Click");
        assert_eq!(v["params"]["DataOfCmd"], "KEY_NETFLIX");
        assert_eq!(v["params"]["Option"], "false");
        assert_eq!(v["params"]["TypeOfRemote"], "SendRemoteKey");
    }

    #[test]
    fn test_launch_payload_shape() {
        let payloads = ott_payloads().unwrap();
        let v: Value = serde_json::from_str(&payloads[5].json).unwrap();

        assert_eq!(v["method"], "ms.channel.emit");
        assert_eq!(v["params"]["event"], "ed.apps.launch");
        assert_eq!(v["params"]["to"], "host");
        assert_eq!(v["params"]["data"]["appId"], "3201606009684");
        assert_eq!(v["params"]["data"]["action_type"], "DEEP_LINK");
        assert_eq!(v["params"]["data"]["metaTag"], "");
    }

    #[test]
    fn test_render_lists_every_payload() {
        let payloads = ott_payloads().unwrap();
        let text = render(&payloads);
        for p in &payloads {
            assert!(text.contains(&p.label));
            assert!(text.contains(&p.json));
        }
    }
}
