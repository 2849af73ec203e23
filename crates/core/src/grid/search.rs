//! Connectivity queries over a grid: flood fill, shortest paths, random floor sampling.
//! All traversal is 4-directional and visits neighbors up, down, left, right.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::Grid;
use crate::mapgen::DungeonRng;
use crate::tile::{Tile, TileFlags};
use crate::types::{Pos, manhattan};

impl Grid {
    /// Connected component containing `start`.
    ///
    /// Without `flags` the connectivity predicate is "walkable"; with `flags` it is
    /// "has all of these bits". Empty when `start` is outside or fails the predicate.
    pub fn flood_fill(&self, start: Pos, flags: Option<TileFlags>) -> BTreeSet<Pos> {
        let passes = |tile: &Tile| match flags {
            Some(flags) => tile.has_flags(flags),
            None => tile.is_walkable(),
        };

        let mut visited = BTreeSet::new();
        if !self.tile(start).is_some_and(passes) {
            return visited;
        }

        let mut queue = VecDeque::from([start]);
        visited.insert(start);
        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if self.tile(neighbor).is_some_and(passes) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        visited
    }

    /// Shortest walkable path from `start` to `goal`, both ends included.
    ///
    /// `None` if either end is outside the grid or not walkable, or if no route exists.
    pub fn find_path(&self, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        if !self.is_walkable(start) || !self.is_walkable(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![start]);
        }

        let mut came_from = BTreeMap::new();
        let mut queue = VecDeque::from([start]);
        came_from.insert(start, start);
        while let Some(current) = queue.pop_front() {
            for neighbor in current.neighbors() {
                if came_from.contains_key(&neighbor) || !self.is_walkable(neighbor) {
                    continue;
                }
                came_from.insert(neighbor, current);
                if neighbor == goal {
                    return Some(reconstruct_path(&came_from, start, goal));
                }
                queue.push_back(neighbor);
            }
        }
        None
    }

    /// Uniform choice among walkable cells.
    pub fn random_floor_tile(&self, rng: &mut DungeonRng) -> Option<Pos> {
        let candidates = self.find_tiles(None, Some(TileFlags::WALKABLE));
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.index(candidates.len())])
    }

    /// Manhattan distance; positions need not be inside the grid.
    pub fn distance(&self, a: Pos, b: Pos) -> u32 {
        manhattan(a, b)
    }
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        // Every visited cell except `start` points at the cell it was reached from.
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}
