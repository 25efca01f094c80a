use crate::player::PlayerId;

/// Ownership class of a tile, with the wire codes used by `tileChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TileKind {
    Unowned = 0,
    Owned = 1,
    Capital = 2,
}

impl TileKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileKind::Unowned),
            1 => Some(TileKind::Owned),
            2 => Some(TileKind::Capital),
            _ => None,
        }
    }
}

/// A single tile on a field. Coordinates are fixed at grid construction;
/// owner, strength, and kind change only through the room's tile-change
/// path, which applies the three together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    x: u32,
    y: u32,
    owner: Option<PlayerId>,
    strength: u32,
    kind: TileKind,
}

impl Tile {
    pub(crate) fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            owner: None,
            strength: 0,
            kind: TileKind::Unowned,
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn owner(&self) -> Option<&PlayerId> {
        self.owner.as_ref()
    }

    pub fn strength(&self) -> u32 {
        self.strength
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn is_owned_by(&self, id: &PlayerId) -> bool {
        self.owner.as_ref() == Some(id)
    }

    pub fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }

    pub fn set_strength(&mut self, strength: u32) {
        self.strength = strength;
    }

    pub fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
    }
}
