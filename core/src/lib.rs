pub mod codec;
pub mod drag;
pub mod field;
pub mod player;
pub mod power;
pub mod protocol;
pub mod room;
pub mod tile;

pub use codec::{decode_server_packet, encode_client_packet, FrameError};
pub use drag::{DragDelta, DragTracker, Release, DRAG_START_DISTANCE_PX};
pub use field::Field;
pub use player::{Player, PlayerId, PlayerRegistry};
pub use power::{PowerMeter, POWER_CAP};
pub use protocol::{
    dispatch, ClientPacket, ConnectionHandler, ServerAttack, ServerError, ServerPacket,
    ServerPlayerJoin, ServerPlayerLost, ServerStart, ServerTileChange, BAD_PACKET_REASON,
};
pub use room::{
    PlayerProfile, Room, RoomPhase, StartError, TileChangeError, TileRefresh,
};
pub use tile::{Tile, TileKind};
