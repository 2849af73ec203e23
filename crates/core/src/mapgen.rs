//! Procedural dungeon generation split into coherent submodules.

pub mod config;
pub mod events;
pub mod presets;
pub mod room;

mod bsp;
mod caves;
mod generator;
mod layout;
mod quests;
mod seed;

pub use config::{GenerationAlgorithm, GenerationConfig};
pub use events::{GenerationEvent, ListenerId, LogEvent};
pub use generator::{CustomLayout, DungeonGenerator};
pub use layout::{carve_room, connect_rooms};
pub use presets::DungeonPreset;
pub use quests::{QuestOutcome, accessible_rooms, place_quest_rooms};
pub use room::{DEFAULT_ROOM_TYPE, Room};
pub use seed::DungeonRng;

use crate::grid::Grid;

/// One-shot generation without listeners or quest rooms.
pub fn generate_dungeon(config: &GenerationConfig) -> (Grid, Vec<Room>) {
    DungeonGenerator::new().generate(config, &[])
}
