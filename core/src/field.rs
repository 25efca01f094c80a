use crate::player::PlayerId;
use crate::tile::Tile;

/// A field of many tiles, stored row-major, with the pan offset the view
/// applies uniformly to every tile.
#[derive(Debug)]
pub struct Field {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    offset_x: f64,
    offset_y: f64,
}

impl Field {
    /// Builds a `width` x `height` grid of unowned tiles. Dimensions are
    /// validated by the room before construction.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(x, y));
            }
        }
        Self {
            width,
            height,
            tiles,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    pub(crate) fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Tile> {
        self.index(x, y).map(move |idx| &mut self.tiles[idx])
    }

    /// Whether the tile at `(x, y)` is owned by `id`. Out-of-range
    /// coordinates count as not owned, so neighbour probes at the field
    /// edge need no special casing.
    pub fn is_owned_by(&self, x: i32, y: i32, id: &PlayerId) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.get(x as u32, y as u32)
            .map(|tile| tile.is_owned_by(id))
            .unwrap_or(false)
    }

    /// Accumulates a drag delta into the view offset. The offset is
    /// unclamped; the grid may be panned arbitrarily far off-screen.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn view_offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }
}
