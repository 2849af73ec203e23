//! Placement of caller-supplied quest-room templates into already-open space.

use crate::grid::Grid;

use super::layout::{PLACEMENT_ATTEMPTS, carve_room};
use super::room::Room;
use super::seed::DungeonRng;

/// Result of placing one template.
#[derive(Clone, Debug, PartialEq)]
pub enum QuestOutcome {
    /// Template moved onto walkable floor that overlaps no other room.
    Placed(Room),
    /// Budget exhausted; the template is returned unchanged.
    Unplaced(Room),
}

impl QuestOutcome {
    pub fn room(&self) -> &Room {
        match self {
            Self::Placed(room) | Self::Unplaced(room) => room,
        }
    }

    pub fn into_room(self) -> Room {
        match self {
            Self::Placed(room) | Self::Unplaced(room) => room,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// Places each template in order, one outcome per template.
///
/// A candidate is accepted when its whole footprint is already walkable and it
/// overlaps neither `rooms` nor templates placed earlier in this call. Accepted
/// rooms are carved and keep the template's type, explicit id and data.
pub fn place_quest_rooms(
    grid: &mut Grid,
    rooms: &[Room],
    templates: &[Room],
    rng: &mut DungeonRng,
) -> Vec<QuestOutcome> {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut placed: Vec<Room> = Vec::new();
    let mut outcomes = Vec::with_capacity(templates.len());

    for template in templates {
        let mut accepted = None;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let Some(x) = rng.range_inclusive(1, width - template.width - 1) else {
                break;
            };
            let Some(y) = rng.range_inclusive(1, height - template.height - 1) else {
                break;
            };
            let candidate = template.placed_at(x, y);
            if rooms.iter().chain(&placed).any(|room| room.overlaps(&candidate)) {
                continue;
            }
            if grid.is_region_walkable(candidate.origin(), candidate.width, candidate.height) {
                accepted = Some(candidate);
                break;
            }
        }

        match accepted {
            Some(room) => {
                carve_room(grid, &room);
                placed.push(room.clone());
                outcomes.push(QuestOutcome::Placed(room));
            }
            None => outcomes.push(QuestOutcome::Unplaced(template.clone())),
        }
    }
    outcomes
}

/// Rooms whose full footprint is walkable in `grid`, in input order.
pub fn accessible_rooms<'a>(grid: &Grid, rooms: &'a [Room]) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| grid.is_region_walkable(room.origin(), room.width, room.height))
        .collect()
}
