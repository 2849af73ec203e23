//! Named grid store for callers that juggle several maps at once.
//!
//! Tile reads and writes made through the registry can be observed per grid, which is
//! how a renderer learns about cells it needs to redraw.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use slotmap::{SlotMap, new_key_type};

use crate::error::RegistryError;
use crate::grid::Grid;
use crate::tile::Tile;
use crate::types::Pos;

new_key_type! {
    pub struct WatcherId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileAccess {
    Changed,
    Accessed,
}

/// One observed tile operation on a named grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileEvent<'a> {
    pub grid: &'a str,
    pub access: TileAccess,
    pub pos: Pos,
    pub tile: Tile,
}

// `Fn` rather than `FnMut`: reads go through `&self`.
type TileWatcher = Box<dyn Fn(&TileEvent<'_>)>;

struct Watch {
    grid: String,
    access: TileAccess,
    callback: TileWatcher,
}

#[derive(Default)]
pub struct GridRegistry {
    grids: BTreeMap<String, Grid>,
    watchers: SlotMap<WatcherId, Watch>,
    // Slot keys are reused, so delivery order is tracked separately.
    order: Vec<WatcherId>,
}

impl fmt::Debug for GridRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridRegistry")
            .field("grids", &self.grids)
            .field("watchers", &self.order.len())
            .finish()
    }
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid under `name`. Without `default_tile` the grid is open floor.
    pub fn spawn_grid(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
        default_tile: Option<Tile>,
    ) -> Result<&mut Grid, RegistryError> {
        match self.grids.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate { name: name.to_string() }),
            Entry::Vacant(slot) => {
                let grid = match default_tile {
                    Some(tile) => Grid::filled(width, height, tile),
                    None => Grid::new(width, height),
                };
                Ok(slot.insert(grid))
            }
        }
    }

    /// Stores an existing grid, e.g. one returned by generation.
    pub fn insert(&mut self, name: &str, grid: Grid) -> Result<(), RegistryError> {
        match self.grids.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate { name: name.to_string() }),
            Entry::Vacant(slot) => {
                slot.insert(grid);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Result<&Grid, RegistryError> {
        self.grids.get(name).ok_or_else(|| RegistryError::Unknown { name: name.to_string() })
    }

    /// Direct access; edits made through the returned grid are not observed.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Grid, RegistryError> {
        self.grids.get_mut(name).ok_or_else(|| RegistryError::Unknown { name: name.to_string() })
    }

    /// Drops the grid together with every watcher registered on it.
    pub fn remove(&mut self, name: &str) -> Result<Grid, RegistryError> {
        let grid = self
            .grids
            .remove(name)
            .ok_or_else(|| RegistryError::Unknown { name: name.to_string() })?;
        self.watchers.retain(|_, watch| watch.grid != name);
        self.order.retain(|id| self.watchers.contains_key(*id));
        Ok(grid)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.grids.keys().map(String::as_str)
    }

    /// Calls `callback` after every successful `set_tile` or `fill_borders` write to `name`.
    pub fn on_tile_changed<F>(
        &mut self,
        name: &str,
        callback: F,
    ) -> Result<WatcherId, RegistryError>
    where
        F: Fn(&TileEvent<'_>) + 'static,
    {
        self.watch(name, TileAccess::Changed, Box::new(callback))
    }

    /// Calls `callback` after every successful `get_tile` read from `name`.
    pub fn on_tile_accessed<F>(
        &mut self,
        name: &str,
        callback: F,
    ) -> Result<WatcherId, RegistryError>
    where
        F: Fn(&TileEvent<'_>) + 'static,
    {
        self.watch(name, TileAccess::Accessed, Box::new(callback))
    }

    /// Returns `false` if `id` was already removed.
    pub fn remove_watcher(&mut self, id: WatcherId) -> bool {
        self.order.retain(|registered| *registered != id);
        self.watchers.remove(id).is_some()
    }

    pub fn get_tile(&self, name: &str, pos: Pos) -> Result<Tile, RegistryError> {
        let tile = self.get(name)?.get_tile(pos)?;
        self.notify(&TileEvent { grid: name, access: TileAccess::Accessed, pos, tile });
        Ok(tile)
    }

    pub fn set_tile(&mut self, name: &str, pos: Pos, tile: Tile) -> Result<(), RegistryError> {
        self.get_mut(name)?.set_tile(pos, tile)?;
        self.notify(&TileEvent { grid: name, access: TileAccess::Changed, pos, tile });
        Ok(())
    }

    /// Fills the outer ring; watchers see each border cell once, in row-major order.
    pub fn fill_borders(&mut self, name: &str, border_tile: Tile) -> Result<(), RegistryError> {
        let grid = self.get_mut(name)?;
        grid.fill_borders(border_tile);
        let (width, height) = (grid.width() as i32, grid.height() as i32);
        if width < 2 || height < 2 {
            return Ok(());
        }
        let border: Vec<Pos> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Pos::new(x, y)))
            .filter(|pos| pos.x == 0 || pos.y == 0 || pos.x == width - 1 || pos.y == height - 1)
            .collect();
        for pos in border {
            let tile = border_tile;
            self.notify(&TileEvent { grid: name, access: TileAccess::Changed, pos, tile });
        }
        Ok(())
    }

    /// One line per row, tiles shown by the first letter of their type name.
    pub fn render_ascii(&self, name: &str) -> Result<String, RegistryError> {
        let grid = self.get(name)?;
        let lines: Vec<String> = grid
            .rows()
            .map(|row| {
                row.iter()
                    .map(|tile| &tile.kind.name()[..1])
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn watch(
        &mut self,
        name: &str,
        access: TileAccess,
        callback: TileWatcher,
    ) -> Result<WatcherId, RegistryError> {
        self.get(name)?;
        let id = self.watchers.insert(Watch { grid: name.to_string(), access, callback });
        self.order.push(id);
        Ok(id)
    }

    fn notify(&self, event: &TileEvent<'_>) {
        let matching = self
            .order
            .iter()
            .filter_map(|id| self.watchers.get(*id))
            .filter(|watch| watch.access == event.access && watch.grid == event.grid);
        for watch in matching {
            (watch.callback)(event);
        }
    }
}
