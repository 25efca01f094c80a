use std::fmt;

use serde_json::Value;

use crate::protocol::{ClientPacket, ServerPacket, SERVER_PACKET_KINDS};

/// Why an inbound frame was not handed to a packet handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Unparseable JSON, a missing or non-string `type`, or a recognized
    /// kind whose fields do not match the packet shape.
    Malformed,
    /// A well-formed frame of a kind this client does not know.
    UnknownKind(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Malformed => write!(f, "malformed packet"),
            FrameError::UnknownKind(kind) => write!(f, "unknown packet kind '{kind}'"),
        }
    }
}

impl std::error::Error for FrameError {}

pub fn encode_client_packet(packet: &ClientPacket) -> Option<String> {
    serde_json::to_string(packet).ok()
}

pub fn decode_server_packet(frame: &str) -> Result<ServerPacket, FrameError> {
    let value: Value = serde_json::from_str(frame).map_err(|_| FrameError::Malformed)?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(FrameError::Malformed)?;
    if !SERVER_PACKET_KINDS.contains(&kind) {
        return Err(FrameError::UnknownKind(kind.to_string()));
    }
    serde_json::from_value(value).map_err(|_| FrameError::Malformed)
}
