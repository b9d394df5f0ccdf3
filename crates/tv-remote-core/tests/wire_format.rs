//! Integration tests for the tv-remote-core wire format.
//!
//! These tests check the exact JSON the TV receives and the handshake events
//! it sends back, through the public API only: commands built with the
//! `Command` constructors and app/key helpers, encoded with `encode_command`,
//! and handshake frames decoded with `decode_handshake`.

use serde_json::{json, Value};
use tv_remote_core::{
    decode_handshake, encode_command, normalize_key_name, resolve_app_id, Command, ControlEndpoint,
    HandshakeEvent, Transport,
};

fn encoded(command: &Command) -> Value {
    serde_json::from_str(&encode_command(command).expect("encode must succeed")).unwrap()
}

#[test]
fn test_key_press_frame_matches_tv_api() {
    let frame = encoded(&Command::key(normalize_key_name("volup")));

    assert_eq!(
        frame,
        json!({
            "method": "ms.remote.control",
            "params": {
                "Cmd": "Click",
                "DataOfCmd": "KEY_VOLUP",
                "Option": "false",
                "TypeOfRemote": "SendRemoteKey"
            }
        })
    );
}

#[test]
fn test_app_launch_frame_matches_tv_api() {
    let frame = encoded(&Command::launch(resolve_app_id("netflix")));

    assert_eq!(
        frame,
        json!({
            "method": "ms.channel.emit",
            "params": {
                "event": "ed.apps.launch",
                "to": "host",
                "data": {
                    "action_type": "DEEP_LINK",
                    "appId": "3201907018807",
                    "metaTag": ""
                }
            }
        })
    );
}

#[test]
fn test_unknown_app_name_is_sent_verbatim() {
    let frame = encoded(&Command::launch(resolve_app_id("hulu")));
    assert_eq!(frame["params"]["data"]["appId"], "hulu");
}

#[test]
fn test_custom_action_type_is_kept() {
    let frame = encoded(&Command::launch_with_action("111299001912", "NATIVE_LAUNCH"));
    assert_eq!(frame["params"]["data"]["action_type"], "NATIVE_LAUNCH");
}

#[test]
fn test_handshake_events_from_a_real_tv() {
    // Captured shapes: the connect event carries client metadata next to the token.
    let connect = r#"{"data":{"clients":[{"attributes":{"name":"U2Ftc3VuZ1JlbW90ZVBPQw=="},"connectTime":1700000000000,"deviceName":"U2Ftc3VuZ1JlbW90ZVBPQw==","id":"c1","isHost":false}],"id":"c1","token":"14498321"},"event":"ms.channel.connect"}"#;
    let refused = r#"{"event":"ms.channel.unauthorized"}"#;

    assert_eq!(
        decode_handshake(connect).unwrap(),
        HandshakeEvent::Connected {
            token: Some("14498321".to_string())
        }
    );
    assert_eq!(decode_handshake(refused).unwrap(), HandshakeEvent::Unauthorized);
}

#[test]
fn test_endpoint_url_for_each_transport() {
    let secure = ControlEndpoint::new("192.168.1.2", Transport::Secure, "SamsungRemotePOC");
    let plain = ControlEndpoint::new("192.168.1.2", Transport::Plain, "SamsungRemotePOC")
        .with_token(Some("14498321".to_string()));

    assert_eq!(
        secure.url(),
        "wss://192.168.1.2:8002/api/v2/channels/samsung.remote.control?name=U2Ftc3VuZ1JlbW90ZVBPQw%3D%3D"
    );
    assert_eq!(
        plain.url(),
        "ws://192.168.1.2:8001/api/v2/channels/samsung.remote.control?name=U2Ftc3VuZ1JlbW90ZVBPQw%3D%3D&token=14498321"
    );
}

#[test]
fn test_endpoint_url_for_ipv6_tv() {
    let endpoint = ControlEndpoint::new("fe80::1", Transport::Plain, "SamsungRemotePOC");

    assert_eq!(
        endpoint.url(),
        "ws://[fe80::1]:8001/api/v2/channels/samsung.remote.control?name=U2Ftc3VuZ1JlbW90ZVBPQw%3D%3D"
    );
}
