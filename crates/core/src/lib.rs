pub mod error;
pub mod grid;
pub mod mapgen;
pub mod registry;
pub mod serialization;
pub mod tile;
pub mod types;

pub use error::{ConfigError, GridError, RegistryError, SerializationError};
pub use grid::Grid;
pub use mapgen::{
    DungeonGenerator, DungeonPreset, DungeonRng, GenerationAlgorithm, GenerationConfig,
    GenerationEvent, ListenerId, LogEvent, QuestOutcome, Room, generate_dungeon,
};
pub use registry::{GridRegistry, TileAccess, TileEvent, WatcherId};
pub use serialization::{DungeonSnapshot, KeyValue};
pub use tile::{Tile, TileFlags, TileType};
pub use types::*;
