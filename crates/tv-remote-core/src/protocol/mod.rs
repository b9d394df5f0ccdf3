//! Protocol module containing message types, the JSON codec, and the
//! control-channel endpoint builder.

pub mod codec;
pub mod endpoint;
pub mod messages;

pub use codec::{decode_handshake, encode_command, ProtocolError};
pub use endpoint::{ControlEndpoint, Transport};
pub use messages::*;
