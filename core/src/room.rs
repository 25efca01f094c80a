use std::fmt;

use crate::field::Field;
use crate::player::{Player, PlayerId, PlayerRegistry};
use crate::power::PowerMeter;
use crate::protocol::{
    ClientPacket, ServerPlayerJoin, ServerPlayerLost, ServerStart, ServerTileChange,
};
use crate::tile::TileKind;

/// Identity the local player chose in the lobby; the server supplies the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub colour: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Playing,
    /// Terminal: a new room must be constructed through a fresh `start`
    /// handshake to play again.
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    InvalidDimensions { width: i32, height: i32 },
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::InvalidDimensions { width, height } => {
                write!(f, "unusable field dimensions {width}x{height}")
            }
        }
    }
}

impl std::error::Error for StartError {}

/// Why an inbound tile change was dropped. The target tile is left in its
/// last valid state in every case; updates are never partially applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileChangeError {
    UnknownOwner(PlayerId),
    OutOfBounds { x: i32, y: i32 },
    UnknownKindCode(u8),
    /// Strength and tile type disagree about whether the tile is owned.
    StrengthKindMismatch { strength: u32, kind: TileKind },
}

impl fmt::Display for TileChangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileChangeError::UnknownOwner(id) => write!(f, "unknown owner id '{id}'"),
            TileChangeError::OutOfBounds { x, y } => {
                write!(f, "coordinates ({x}, {y}) outside the field")
            }
            TileChangeError::UnknownKindCode(code) => write!(f, "unknown tile type code {code}"),
            TileChangeError::StrengthKindMismatch { strength, kind } => {
                write!(f, "strength {strength} inconsistent with tile type {kind:?}")
            }
        }
    }
}

impl std::error::Error for TileChangeError {}

/// Everything the render collaborator needs to repaint one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRefresh {
    pub x: u32,
    pub y: u32,
    pub strength: u32,
    pub kind: TileKind,
    pub owner_colour: Option<String>,
    pub owner_name: Option<String>,
}

/// One game session, created per successful `start` handshake and destroyed
/// on return to the lobby or when the connection drops.
#[derive(Debug)]
pub struct Room {
    field: Field,
    players: PlayerRegistry,
    self_id: PlayerId,
    room_number: u32,
    phase: RoomPhase,
    power: PowerMeter,
}

impl Room {
    pub fn new(
        packet: &ServerStart,
        profile: &PlayerProfile,
        now_ms: f64,
    ) -> Result<Self, StartError> {
        if packet.width <= 0 || packet.height <= 0 {
            return Err(StartError::InvalidDimensions {
                width: packet.width,
                height: packet.height,
            });
        }
        let self_id = PlayerId::new(packet.player_id.clone());
        let mut players = PlayerRegistry::new();
        players.insert(Player::new(
            self_id.clone(),
            profile.name.clone(),
            profile.colour.clone(),
        ));
        Ok(Self {
            field: Field::new(packet.width as u32, packet.height as u32),
            players,
            self_id,
            room_number: packet.room,
            phase: RoomPhase::Playing,
            power: PowerMeter::new(now_ms),
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn self_id(&self) -> &PlayerId {
        &self.self_id
    }

    pub fn room_number(&self) -> u32 {
        self.room_number
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn power_level(&self, now_ms: f64) -> u32 {
        self.power.level(now_ms)
    }

    /// Registers a newly joined player. A duplicate id keeps the existing
    /// entry; the registry is append-only for the life of the room.
    pub fn handle_player_join(&mut self, packet: ServerPlayerJoin) -> bool {
        let player = Player::new(packet.id, packet.name, packet.colour);
        let id = player.id.clone();
        let joined = self.players.insert(player);
        if !joined {
            tracing::warn!(%id, "duplicate player join ignored");
        }
        joined
    }

    /// Applies one tile change, or rejects it whole. Owner, strength, and
    /// kind are written together so a zero-strength tile is always unowned
    /// with no owner reference.
    pub fn handle_tile_change(
        &mut self,
        packet: ServerTileChange,
    ) -> Result<TileRefresh, TileChangeError> {
        let owner_id = PlayerId::new(packet.owner);
        if !self.players.contains(&owner_id) {
            return Err(TileChangeError::UnknownOwner(owner_id));
        }
        if !self.field.contains(packet.x, packet.y) {
            return Err(TileChangeError::OutOfBounds {
                x: packet.x,
                y: packet.y,
            });
        }
        let kind = TileKind::from_code(packet.tile_type)
            .ok_or(TileChangeError::UnknownKindCode(packet.tile_type))?;
        if (packet.strength == 0) != (kind == TileKind::Unowned) {
            return Err(TileChangeError::StrengthKindMismatch {
                strength: packet.strength,
                kind,
            });
        }

        let (x, y) = (packet.x as u32, packet.y as u32);
        let owner = self
            .players
            .get(&owner_id)
            .filter(|_| packet.strength > 0)
            .cloned();
        let refresh = TileRefresh {
            x,
            y,
            strength: packet.strength,
            kind,
            owner_colour: owner.as_ref().map(|player| player.colour.clone()),
            owner_name: owner.as_ref().map(|player| player.name.clone()),
        };
        if let Some(tile) = self.field.get_mut(x, y) {
            tile.set_owner(owner.map(|player| player.id));
            tile.set_strength(packet.strength);
            tile.set_kind(kind);
        }
        Ok(refresh)
    }

    /// Returns whether the local player was the one eliminated. Other
    /// players' eliminations are not tracked by this protocol revision.
    pub fn handle_player_lost(&mut self, packet: ServerPlayerLost) -> bool {
        let id = PlayerId::new(packet.player);
        if id != self.self_id {
            tracing::debug!(%id, "another player was eliminated");
            return false;
        }
        self.phase = RoomPhase::Lost;
        true
    }

    /// Whether a click on `(x, y)` is worth sending right now: some power
    /// has accrued and the tile is the local player's or 4-adjacent to one
    /// that is. The server remains the authority on the attack itself.
    pub fn can_attack(&self, x: u32, y: u32, now_ms: f64) -> bool {
        if self.power.level(now_ms) == 0 {
            return false;
        }
        let (x, y) = (x as i32, y as i32);
        self.field.is_owned_by(x, y, &self.self_id)
            || self.field.is_owned_by(x + 1, y, &self.self_id)
            || self.field.is_owned_by(x - 1, y, &self.self_id)
            || self.field.is_owned_by(x, y + 1, &self.self_id)
            || self.field.is_owned_by(x, y - 1, &self.self_id)
    }

    /// Resolves a tile click into the outbound packet to send, if any.
    /// Sending spends the accrued power by restarting the meter.
    pub fn tile_clicked(&mut self, x: u32, y: u32, now_ms: f64) -> Option<ClientPacket> {
        if self.phase != RoomPhase::Playing {
            return None;
        }
        if !self.can_attack(x, y, now_ms) {
            return None;
        }
        self.power.reset(now_ms);
        Some(ClientPacket::Click {
            x: x as i32,
            y: y as i32,
        })
    }

    /// Periodic tick: the power level to display while playing, nothing
    /// once the room is lost.
    pub fn tick(&self, now_ms: f64) -> Option<u32> {
        match self.phase {
            RoomPhase::Playing => Some(self.power.level(now_ms)),
            RoomPhase::Lost => None,
        }
    }

    /// Drag-pan the view; deltas accumulate without clamping.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.field.pan(dx, dy);
    }
}
