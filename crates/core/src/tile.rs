//! Per-cell tile values.
//!
//! A tile's walkability comes only from its [`TileFlags::WALKABLE`] bit. The type and
//! the flags are independent; nothing in the crate derives one from the other.

use std::fmt;

use bitflags::bitflags;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SerializationError;
use crate::types::Pos;

/// Stable names are used for key/value output: `FLOOR`, `WALL`, `ENTRANCE`, `EXIT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Floor,
    Wall,
    Entrance,
    Exit,
}

impl TileType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Floor => "FLOOR",
            Self::Wall => "WALL",
            Self::Entrance => "ENTRANCE",
            Self::Exit => "EXIT",
        }
    }

    /// Single-character glyph used by ASCII dumps.
    pub fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
            Self::Entrance => '<',
            Self::Exit => '>',
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TileFlags: u8 {
        const WALKABLE = 0x01;
        const BLOCKS_SIGHT = 0x02;
        const IS_EXIT = 0x04;
    }
}

// Flags travel as their raw bits; unknown bits are rejected rather than dropped.
impl Serialize for TileFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        TileFlags::from_bits(bits).ok_or_else(|| {
            D::Error::custom(SerializationError::UnknownFlagBits(bits))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TileRecord", into = "TileRecord")]
pub struct Tile {
    pub kind: TileType,
    pub flags: TileFlags,
    /// Optional coordinate tag; grids set it on the tiles they create.
    pub pos: Option<Pos>,
}

impl Tile {
    pub const fn new(kind: TileType, flags: TileFlags) -> Self {
        Self { kind, flags, pos: None }
    }

    pub const fn floor() -> Self {
        Self::new(TileType::Floor, TileFlags::WALKABLE)
    }

    pub const fn wall() -> Self {
        Self::new(TileType::Wall, TileFlags::empty())
    }

    pub fn with_position(self, pos: Pos) -> Self {
        Self { pos: Some(pos), ..self }
    }

    pub fn is_walkable(&self) -> bool {
        self.flags.contains(TileFlags::WALKABLE)
    }

    pub fn blocks_sight(&self) -> bool {
        self.flags.contains(TileFlags::BLOCKS_SIGHT)
    }

    pub fn is_exit(&self) -> bool {
        self.flags.contains(TileFlags::IS_EXIT)
    }

    pub fn has_flags(&self, flags: TileFlags) -> bool {
        self.flags.contains(flags)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} {pos} flags={:#04x}", self.kind.name(), self.flags.bits()),
            None => write!(f, "{} flags={:#04x}", self.kind.name(), self.flags.bits()),
        }
    }
}

/// Key/value shape of a tile: `{"type", "flags", "x", "y"}`.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "type")]
    kind: TileType,
    flags: TileFlags,
    #[serde(default)]
    x: Option<i32>,
    #[serde(default)]
    y: Option<i32>,
}

impl TryFrom<TileRecord> for Tile {
    type Error = SerializationError;

    fn try_from(record: TileRecord) -> Result<Self, Self::Error> {
        let pos = match (record.x, record.y) {
            (Some(x), Some(y)) => Some(Pos::new(x, y)),
            (None, None) => None,
            (x, y) => return Err(SerializationError::PartialCoordinates { x, y }),
        };
        Ok(Self { kind: record.kind, flags: record.flags, pos })
    }
}

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        Self {
            kind: tile.kind,
            flags: tile.flags,
            x: tile.pos.map(|pos| pos.x),
            y: tile.pos.map(|pos| pos.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn walkability_follows_flag_not_type() {
        let walkable_wall = Tile::new(TileType::Wall, TileFlags::WALKABLE);
        let blocked_floor = Tile::new(TileType::Floor, TileFlags::BLOCKS_SIGHT);
        assert!(walkable_wall.is_walkable());
        assert!(!blocked_floor.is_walkable());
        assert!(blocked_floor.blocks_sight());
    }

    #[test]
    fn key_value_form_uses_type_names_and_raw_flag_bits() {
        let tile = Tile::new(TileType::Exit, TileFlags::WALKABLE | TileFlags::IS_EXIT)
            .with_position(Pos::new(6, 7));
        let value = serde_json::to_value(tile).unwrap();
        assert_eq!(value, json!({"type": "EXIT", "flags": 5, "x": 6, "y": 7}));
    }

    #[test]
    fn missing_coordinates_decode_as_untagged() {
        let tile: Tile = serde_json::from_value(json!({"type": "WALL", "flags": 2})).unwrap();
        assert_eq!(tile, Tile::new(TileType::Wall, TileFlags::BLOCKS_SIGHT));
    }

    #[test]
    fn half_specified_coordinates_are_rejected() {
        let result: Result<Tile, _> =
            serde_json::from_value(json!({"type": "FLOOR", "flags": 1, "x": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_flag_bits_are_rejected() {
        let result: Result<Tile, _> = serde_json::from_value(json!({"type": "FLOOR", "flags": 64}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_type_is_rejected() {
        let result: Result<Tile, _> = serde_json::from_value(json!({"flags": 1}));
        assert!(result.is_err());
    }
}
