//! Owned 2D tile storage with bounds-checked access and region operations.
//!
//! Tiles are stored by value in row-major order (`y` outer). Cloning a grid copies
//! every tile; clones never alias.

mod search;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::serialization::GridRecord;
use crate::tile::{Tile, TileFlags, TileType};
use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord", into = "GridRecord")]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Grid filled with walkable floor.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Tile::floor())
    }

    /// Grid where every cell is `default_tile`, tagged with its own position.
    pub fn filled(width: usize, height: usize, default_tile: Tile) -> Self {
        let mut tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                tiles.push(default_tile.with_position(Pos::new(x as i32, y as i32)));
            }
        }
        Self { width, height, tiles }
    }

    pub(crate) fn from_rows(width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self { width, height, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get_tile(&self, pos: Pos) -> Result<Tile, GridError> {
        self.tile(pos).copied().ok_or_else(|| self.out_of_bounds(pos))
    }

    pub fn set_tile(&mut self, pos: Pos, tile: Tile) -> Result<(), GridError> {
        let index = self.index(pos).ok_or_else(|| self.out_of_bounds(pos))?;
        self.tiles[index] = tile;
        Ok(())
    }

    /// Borrowing lookup; `None` outside the grid.
    pub fn tile(&self, pos: Pos) -> Option<&Tile> {
        self.index(pos).map(|index| &self.tiles[index])
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    /// Overwrites the outermost ring. Grids narrower or shorter than 2 are left untouched.
    pub fn fill_borders(&mut self, border_tile: Tile) {
        if self.width < 2 || self.height < 2 {
            return;
        }
        let right = self.width - 1;
        let bottom = self.height - 1;
        for x in 0..self.width {
            self.tiles[x] = border_tile;
            self.tiles[bottom * self.width + x] = border_tile;
        }
        for y in 0..self.height {
            self.tiles[y * self.width] = border_tile;
            self.tiles[y * self.width + right] = border_tile;
        }
    }

    /// Copies the `width`x`height` region at `origin` into a new grid.
    ///
    /// Cells that fall outside this grid keep the new grid's default floor tile.
    pub fn subgrid(&self, origin: Pos, width: usize, height: usize) -> Grid {
        let mut region = Grid::new(width, height);
        for (local, slot) in region.positions().zip(region.tiles.iter_mut()) {
            let source = origin.checked_offset(local.x, local.y);
            if let Some(tile) = source.and_then(|source| self.tile(source)) {
                *slot = *tile;
            }
        }
        region
    }

    /// Pastes `other` with its top-left at `origin`.
    ///
    /// Returns `false` without touching any cell if the footprint leaves the grid.
    pub fn stamp(&mut self, other: &Grid, origin: Pos) -> bool {
        if other.width == 0 || other.height == 0 {
            return true;
        }
        let far_corner = i32::try_from(other.width - 1)
            .ok()
            .zip(i32::try_from(other.height - 1).ok())
            .and_then(|(dx, dy)| origin.checked_offset(dx, dy));
        let Some(far_corner) = far_corner else {
            return false;
        };
        if !self.in_bounds(origin) || !self.in_bounds(far_corner) {
            return false;
        }
        // Both corners are in bounds, so every target cell is too.
        let (origin_x, origin_y) = (origin.x as usize, origin.y as usize);
        for (local, tile) in other.iter_tiles() {
            let index = (origin_y + local.y as usize) * self.width + origin_x + local.x as usize;
            self.tiles[index] = *tile;
        }
        true
    }

    /// Every position matching both filters, in row-major order. `None` matches everything.
    pub fn find_tiles(&self, kind: Option<TileType>, flags: Option<TileFlags>) -> Vec<Pos> {
        self.iter_tiles()
            .filter(|(_, tile)| kind.is_none_or(|kind| tile.kind == kind))
            .filter(|(_, tile)| flags.is_none_or(|flags| tile.has_flags(flags)))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// True only if every cell of the rectangle is inside the grid and walkable.
    pub fn is_region_walkable(&self, origin: Pos, width: i32, height: i32) -> bool {
        if width <= 0 || height <= 0 {
            return true;
        }
        let Some(end) = origin.checked_offset(width, height) else {
            return false;
        };
        (origin.y..end.y).all(|y| (origin.x..end.x).all(|x| self.is_walkable(Pos::new(x, y))))
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_walkable()).count()
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = (Pos, &Tile)> + '_ {
        self.positions().zip(self.tiles.iter())
    }

    /// Row slices top to bottom; a zero-width grid still yields `height` empty rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        (0..self.height).map(move |y| &self.tiles[y * self.width..(y + 1) * self.width])
    }

    /// Compact byte encoding of dimensions, types and flags for fingerprinting.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len() * 2);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile.kind {
                TileType::Floor => 0,
                TileType::Wall => 1,
                TileType::Entrance => 2,
                TileType::Exit => 3,
            });
            bytes.push(tile.flags.bits());
        }
        bytes
    }

    fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Pos::new(x as i32, y as i32)))
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.y as usize * self.width + pos.x as usize)
    }

    fn out_of_bounds(&self, pos: Pos) -> GridError {
        GridError::OutOfBounds { pos, width: self.width, height: self.height }
    }
}
