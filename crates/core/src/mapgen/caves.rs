//! Cellular-automata caves and room extraction from their open components.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::tile::{Tile, TileFlags, TileType};
use crate::types::Pos;

use super::config::GenerationConfig;
use super::room::Room;
use super::seed::DungeonRng;

const WALL_NEIGHBOR_THRESHOLD: usize = 5;
const MIN_CAVE_ROOM_CELLS: usize = 5;

pub(super) fn generate_caves(
    config: &GenerationConfig,
    rng: &mut DungeonRng,
) -> (Grid, Vec<Room>) {
    let mut grid = Grid::filled(config.width, config.height, Tile::wall());
    for y in 0..config.height as i32 {
        for x in 0..config.width as i32 {
            let pos = Pos::new(x, y);
            let tile = if rng.unit_f64() < config.wall_fill_probability {
                Tile::wall()
            } else {
                Tile::floor()
            };
            let _ = grid.set_tile(pos, tile.with_position(pos));
        }
    }

    for _ in 0..config.iterations {
        grid = smooth(&grid);
    }

    let rooms = extract_cave_rooms(&grid);
    (grid, rooms)
}

/// One smoothing pass. Reads from `grid`, writes a fresh copy; the outer ring is kept.
fn smooth(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let pos = Pos::new(x, y);
            let tile = if wall_neighbors(grid, pos) >= WALL_NEIGHBOR_THRESHOLD {
                Tile::wall()
            } else {
                Tile::floor()
            };
            let _ = next.set_tile(pos, tile.with_position(pos));
        }
    }
    next
}

/// Wall count over the Moore neighborhood, judged by tile type.
fn wall_neighbors(grid: &Grid, center: Pos) -> usize {
    let mut walls = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let neighbor = Pos::new(center.x + dx, center.y + dy);
            if grid.tile(neighbor).is_some_and(|tile| tile.kind == TileType::Wall) {
                walls += 1;
            }
        }
    }
    walls
}

/// Bounding box of every walkable component larger than four cells, in scan order
/// of each component's first cell.
pub(super) fn extract_cave_rooms(grid: &Grid) -> Vec<Room> {
    let mut visited = BTreeSet::new();
    let mut rooms = Vec::new();
    for (pos, tile) in grid.iter_tiles() {
        if !tile.is_walkable() || visited.contains(&pos) {
            continue;
        }
        let component = grid.flood_fill(pos, Some(TileFlags::WALKABLE));
        if component.len() >= MIN_CAVE_ROOM_CELLS {
            rooms.push(bounding_room(&component));
        }
        visited.extend(component);
    }
    rooms
}

fn bounding_room(component: &BTreeSet<Pos>) -> Room {
    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for pos in component {
        min_x = min_x.min(pos.x);
        max_x = max_x.max(pos.x);
        min_y = min_y.min(pos.y);
        max_y = max_y.max(pos.y);
    }
    Room::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_probability_opens_everything_but_keeps_ring_rules() {
        let config = GenerationConfig::new(10, 8).with_cave_parameters(0.0, 3);
        let mut rng = DungeonRng::seeded(3);
        let (grid, rooms) = generate_caves(&config, &mut rng);
        assert_eq!(grid.walkable_count(), 80);
        assert_eq!(rooms, vec![Room::new(0, 0, 10, 8)]);
    }

    #[test]
    fn full_probability_yields_solid_rock() {
        let config = GenerationConfig::new(10, 8).with_cave_parameters(1.0, 4);
        let mut rng = DungeonRng::seeded(3);
        let (grid, rooms) = generate_caves(&config, &mut rng);
        assert_eq!(grid.walkable_count(), 0);
        assert!(rooms.is_empty());
    }

    #[test]
    fn smoothing_uses_majority_of_eight_neighbors() {
        // Single wall in an open field disappears; a floor cell walled on 5 sides fills in.
        let mut grid = Grid::new(7, 7);
        grid.set_tile(Pos::new(2, 2), Tile::wall()).unwrap();
        for pos in [(4, 3), (5, 3), (5, 4), (5, 5), (4, 5)] {
            grid.set_tile(Pos::new(pos.0, pos.1), Tile::wall()).unwrap();
        }
        let smoothed = smooth(&grid);
        assert!(smoothed.is_walkable(Pos::new(2, 2)));
        assert!(!smoothed.is_walkable(Pos::new(4, 4)));
    }

    #[test]
    fn outer_ring_is_never_recomputed() {
        let mut grid = Grid::filled(5, 5, Tile::wall());
        grid.set_tile(Pos::new(0, 2), Tile::floor()).unwrap();
        let smoothed = smooth(&grid);
        assert!(smoothed.is_walkable(Pos::new(0, 2)));
        assert_eq!(smoothed.walkable_count(), 1);
    }

    #[test]
    fn small_components_are_not_rooms() {
        let mut grid = Grid::filled(12, 6, Tile::wall());
        // Four-cell pocket: ignored.
        for x in 1..=4 {
            grid.set_tile(Pos::new(x, 1), Tile::floor()).unwrap();
        }
        // Five-cell L: kept as its bounding box.
        for (x, y) in [(7, 1), (8, 1), (9, 1), (9, 2), (9, 3)] {
            grid.set_tile(Pos::new(x, y), Tile::floor()).unwrap();
        }
        assert_eq!(extract_cave_rooms(&grid), vec![Room::new(7, 1, 3, 3)]);
    }

    #[test]
    fn same_seed_same_cave() {
        let config = GenerationConfig::new(30, 20);
        let first = generate_caves(&config, &mut DungeonRng::seeded(11));
        let second = generate_caves(&config, &mut DungeonRng::seeded(11));
        assert_eq!(first, second);
    }
}
