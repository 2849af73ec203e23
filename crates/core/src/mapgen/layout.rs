//! Room carving, L-shaped corridors and the random-rooms strategy.

use crate::grid::Grid;
use crate::tile::Tile;
use crate::types::Pos;

use super::config::GenerationConfig;
use super::room::Room;
use super::seed::DungeonRng;

pub(super) const PLACEMENT_ATTEMPTS: usize = 100;

/// Sets every in-bounds cell of `room` to walkable floor.
pub fn carve_room(grid: &mut Grid, room: &Room) {
    for pos in room.positions() {
        carve_cell(grid, pos);
    }
}

/// Joins each room to the next one in slice order.
///
/// The corridor runs horizontally along the first center's row, then vertically
/// along the second center's column. Cells outside the grid are skipped.
pub fn connect_rooms(grid: &mut Grid, rooms: &[Room]) {
    for pair in rooms.windows(2) {
        carve_l_shaped_corridor(grid, pair[0].center(), pair[1].center());
    }
}

fn carve_l_shaped_corridor(grid: &mut Grid, start: Pos, end: Pos) {
    carve_horizontal_line(grid, start.y, start.x, end.x);
    carve_vertical_line(grid, end.x, start.y, end.y);
}

fn carve_horizontal_line(grid: &mut Grid, y: i32, left_x: i32, right_x: i32) {
    for x in left_x.min(right_x)..=left_x.max(right_x) {
        carve_cell(grid, Pos::new(x, y));
    }
}

fn carve_vertical_line(grid: &mut Grid, x: i32, top_y: i32, bottom_y: i32) {
    for y in top_y.min(bottom_y)..=top_y.max(bottom_y) {
        carve_cell(grid, Pos::new(x, y));
    }
}

fn carve_cell(grid: &mut Grid, pos: Pos) {
    // Out-of-bounds cells are clipped, never reported.
    let _ = grid.set_tile(pos, Tile::floor().with_position(pos));
}

/// Samples non-overlapping rooms on a solid grid and joins them in acceptance order.
pub(super) fn generate_random_rooms(
    config: &GenerationConfig,
    rng: &mut DungeonRng,
) -> (Grid, Vec<Room>) {
    let mut grid = Grid::filled(config.width, config.height, Tile::wall());
    let width = config.width as i32;
    let height = config.height as i32;
    let min_size = config.min_room_size.max(1) as i32;
    let max_size = config.max_room_size as i32;

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..PLACEMENT_ATTEMPTS {
        if rooms.len() >= config.target_room_count {
            break;
        }
        let Some(room_width) = rng.range_inclusive(min_size, max_size) else {
            continue;
        };
        let Some(room_height) = rng.range_inclusive(min_size, max_size) else {
            continue;
        };
        let Some(x) = rng.range_inclusive(1, width - room_width - 1) else {
            continue;
        };
        let Some(y) = rng.range_inclusive(1, height - room_height - 1) else {
            continue;
        };

        let candidate = Room::new(x, y, room_width, room_height);
        if rooms.iter().any(|existing| existing.overlaps(&candidate)) {
            continue;
        }
        rooms.push(candidate);
    }

    for room in &rooms {
        carve_room(&mut grid, room);
    }
    connect_rooms(&mut grid, &rooms);
    (grid, rooms)
}
