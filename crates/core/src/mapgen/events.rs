//! Generation lifecycle events: borrowed views for listeners, owned records for the log.

use slotmap::new_key_type;

use crate::grid::Grid;

use super::config::{GenerationAlgorithm, GenerationConfig};
use super::room::Room;

new_key_type! {
    pub struct ListenerId;
}

/// Delivered synchronously to every listener, in registration order.
#[derive(Clone, Copy, Debug)]
pub enum GenerationEvent<'a> {
    Started(&'a GenerationConfig),
    RoomPlaced(&'a Room),
    QuestRoomPlaced(&'a Room),
    /// Placement budget ran out; the room is the unchanged template.
    QuestRoomUnplaced(&'a Room),
    Completed { grid: &'a Grid, rooms: &'a [Room] },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    GenerationStarted {
        algorithm: GenerationAlgorithm,
        seed: Option<u64>,
        width: usize,
        height: usize,
    },
    RoomPlaced { room_id: String, x: i32, y: i32, width: i32, height: i32 },
    QuestRoomPlaced { room_id: String, x: i32, y: i32, width: i32, height: i32 },
    QuestRoomUnplaced { room_id: String },
    GenerationCompleted { room_count: usize, walkable_tiles: usize },
}

impl From<&GenerationEvent<'_>> for LogEvent {
    fn from(event: &GenerationEvent<'_>) -> Self {
        match *event {
            GenerationEvent::Started(config) => Self::GenerationStarted {
                algorithm: config.algorithm,
                seed: config.seed,
                width: config.width,
                height: config.height,
            },
            GenerationEvent::RoomPlaced(room) => Self::RoomPlaced {
                room_id: room.room_id(),
                x: room.x,
                y: room.y,
                width: room.width,
                height: room.height,
            },
            GenerationEvent::QuestRoomPlaced(room) => Self::QuestRoomPlaced {
                room_id: room.room_id(),
                x: room.x,
                y: room.y,
                width: room.width,
                height: room.height,
            },
            GenerationEvent::QuestRoomUnplaced(room) => {
                Self::QuestRoomUnplaced { room_id: room.room_id() }
            }
            GenerationEvent::Completed { grid, rooms } => Self::GenerationCompleted {
                room_count: rooms.len(),
                walkable_tiles: grid.walkable_count(),
            },
        }
    }
}
