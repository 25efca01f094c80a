use serde::{Deserialize, Serialize};

use crate::codec::{self, FrameError};

/// Packets the client writes to the socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientPacket {
    #[serde(rename = "play")]
    Play {
        username: String,
        colour: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        room: Option<u32>,
    },
    #[serde(rename = "click")]
    Click { x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerError {
    pub message: String,
    pub recoverable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerStart {
    pub room: u32,
    pub width: i32,
    pub height: i32,
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerPlayerJoin {
    pub id: String,
    pub name: String,
    pub colour: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerTileChange {
    pub x: i32,
    pub y: i32,
    pub owner: String,
    pub strength: u32,
    #[serde(rename = "tileType")]
    pub tile_type: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerPlayerLost {
    pub player: String,
}

/// Reserved by the protocol; no fields are specified yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerAttack {}

/// Packets the server writes to the socket, keyed by the `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ServerPacket {
    #[serde(rename = "error")]
    Error(ServerError),
    #[serde(rename = "start")]
    Start(ServerStart),
    #[serde(rename = "playerJoin")]
    PlayerJoin(ServerPlayerJoin),
    #[serde(rename = "tileChange")]
    TileChange(ServerTileChange),
    #[serde(rename = "mapLoaded")]
    MapLoaded,
    #[serde(rename = "playerLost")]
    PlayerLost(ServerPlayerLost),
    #[serde(rename = "attack")]
    Attack(ServerAttack),
}

/// The `type` values this client understands. Anything else is dropped as a
/// forward-compatible no-op rather than reported as a bad packet.
pub(crate) const SERVER_PACKET_KINDS: [&str; 7] = [
    "error",
    "start",
    "playerJoin",
    "tileChange",
    "mapLoaded",
    "playerLost",
    "attack",
];

pub const BAD_PACKET_REASON: &str = "Bad packet received";

/// Acts on events from a connection. Implemented by the application shell in
/// the browser and by the bot session in the native tooling.
pub trait ConnectionHandler {
    /// Executed when the connection has been established.
    fn on_open(&mut self);

    /// Executed when the socket was closed.
    fn on_socket_closed(&mut self);

    /// Executed when a transport-level error occurred, or when an inbound
    /// frame could not be decoded.
    fn on_socket_error(&mut self, reason: &str);

    fn on_error(&mut self, packet: ServerError);

    fn on_start(&mut self, packet: ServerStart);

    fn on_player_joined(&mut self, packet: ServerPlayerJoin);

    fn on_tile_change(&mut self, packet: ServerTileChange);

    /// Executed when the initial burst of tile changes is complete.
    fn on_map_loaded(&mut self);

    fn on_player_lost(&mut self, packet: ServerPlayerLost);

    fn on_attacked(&mut self, packet: ServerAttack);
}

/// Decodes one inbound text frame and routes it to the matching handler
/// method. Malformed frames surface as `on_socket_error` with
/// [`BAD_PACKET_REASON`]; frames of an unknown kind are logged and dropped.
pub fn dispatch(handler: &mut impl ConnectionHandler, frame: &str) {
    match codec::decode_server_packet(frame) {
        Ok(ServerPacket::Error(packet)) => handler.on_error(packet),
        Ok(ServerPacket::Start(packet)) => handler.on_start(packet),
        Ok(ServerPacket::PlayerJoin(packet)) => handler.on_player_joined(packet),
        Ok(ServerPacket::TileChange(packet)) => handler.on_tile_change(packet),
        Ok(ServerPacket::MapLoaded) => handler.on_map_loaded(),
        Ok(ServerPacket::PlayerLost(packet)) => handler.on_player_lost(packet),
        Ok(ServerPacket::Attack(packet)) => handler.on_attacked(packet),
        Err(FrameError::UnknownKind(kind)) => {
            tracing::warn!(%kind, "dropping packet of unknown kind");
        }
        Err(FrameError::Malformed) => handler.on_socket_error(BAD_PACKET_REASON),
    }
}
