//! Error types shared by the grid, registry, configuration and serialization layers.

use std::io;

use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: usize, height: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("grid '{name}' already exists")]
    Duplicate { name: String },
    #[error("grid '{name}' does not exist")]
    Unknown { name: String },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Reasons a [`GenerationConfig`](crate::mapgen::GenerationConfig) cannot produce a
/// sensible layout.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("dungeon dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("min_room_size must be at least 1")]
    ZeroRoomSize,
    #[error("min_room_size {min} exceeds max_room_size {max}")]
    InvertedRoomSizes { min: usize, max: usize },
    #[error("a {room_size}x{room_size} room with a 1-cell margin does not fit in {width}x{height}")]
    RoomDoesNotFit { room_size: usize, width: usize, height: usize },
    #[error("wall_fill_probability {0} is outside [0, 1]")]
    InvalidWallProbability(f64),
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("malformed key/value data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("tile flags contain unknown bits {0:#04x}")]
    UnknownFlagBits(u8),
    #[error("tile coordinate tag needs both x and y, got x={x:?} y={y:?}")]
    PartialCoordinates { x: Option<i32>, y: Option<i32> },
    #[error("grid declares {width}x{height} but tile rows do not match")]
    GridShapeMismatch { width: usize, height: usize },
    #[error("room '{room_id}' has non-positive size {width}x{height}")]
    InvalidRoomSize { room_id: String, width: i32, height: i32 },
}
