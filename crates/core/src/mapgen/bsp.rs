//! Binary space partitioning: split the interior recursively, one room per leaf.

use crate::grid::Grid;
use crate::tile::Tile;

use super::config::GenerationConfig;
use super::layout::{carve_room, connect_rooms};
use super::room::Room;
use super::seed::DungeonRng;

const MAX_BSP_DEPTH: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

pub(super) fn generate_bsp(
    config: &GenerationConfig,
    rng: &mut DungeonRng,
) -> (Grid, Vec<Room>) {
    let mut grid = Grid::filled(config.width, config.height, Tile::wall());
    let interior = Region {
        x: 1,
        y: 1,
        width: config.width as i32 - 2,
        height: config.height as i32 - 2,
    };

    let mut rooms = Vec::new();
    if interior.width > 0 && interior.height > 0 {
        split(interior, 0, config, rng, &mut rooms);
    }

    for room in &rooms {
        carve_room(&mut grid, room);
    }
    connect_rooms(&mut grid, &rooms);
    (grid, rooms)
}

/// Depth-first: the whole first child subtree is visited before the second.
fn split(
    region: Region,
    depth: u32,
    config: &GenerationConfig,
    rng: &mut DungeonRng,
    rooms: &mut Vec<Room>,
) {
    let min_size = config.min_room_size.max(1) as i32;
    let too_small = region.width < min_size * 2 || region.height < min_size * 2;
    if too_small || depth >= MAX_BSP_DEPTH {
        if let Some(room) = leaf_room(region, config, rng) {
            rooms.push(room);
        }
        return;
    }

    let (first, second) = if rng.coin_flip() {
        // Vertical cut: left and right halves.
        let Some(offset) = rng.range_inclusive(min_size, region.width - min_size) else {
            return;
        };
        (
            Region { width: offset, ..region },
            Region { x: region.x + offset, width: region.width - offset, ..region },
        )
    } else {
        let Some(offset) = rng.range_inclusive(min_size, region.height - min_size) else {
            return;
        };
        (
            Region { height: offset, ..region },
            Region { y: region.y + offset, height: region.height - offset, ..region },
        )
    };
    split(first, depth + 1, config, rng, rooms);
    split(second, depth + 1, config, rng, rooms);
}

/// Room strictly inside `region`, leaving at least one cell of the region free on the
/// right and bottom so rooms in neighboring leaves never touch.
fn leaf_room(region: Region, config: &GenerationConfig, rng: &mut DungeonRng) -> Option<Room> {
    let max_width = (config.max_room_size as i32).min(region.width - 1);
    let max_height = (config.max_room_size as i32).min(region.height - 1);
    if max_width < 1 || max_height < 1 {
        return None;
    }
    let min_width = (config.min_room_size as i32).max(1).min(max_width);
    let min_height = (config.min_room_size as i32).max(1).min(max_height);

    let room_width = rng.range_inclusive(min_width, max_width)?;
    let room_height = rng.range_inclusive(min_height, max_height)?;
    let x = region.x + rng.range_inclusive(0, region.width - room_width - 1)?;
    let y = region.y + rng.range_inclusive(0, region.height - room_height - 1)?;
    Some(Room::new(x, y, room_width, room_height))
}
