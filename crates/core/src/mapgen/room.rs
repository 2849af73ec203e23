//! Rectangular rooms tagged with a semantic type and id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SerializationError;
use crate::types::Pos;

pub const DEFAULT_ROOM_TYPE: &str = "normal";

/// Axis-aligned room. Extents are half-open: `[x, x + width)` by `[y, y + height)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RoomRecord", into = "RoomRecord")]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Free-form tag such as `normal`, `quest` or `boss`.
    pub room_type: String,
    id: Option<String>,
    /// Arbitrary caller data carried along with the room.
    pub data: BTreeMap<String, Value>,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            x,
            y,
            width,
            height,
            room_type: DEFAULT_ROOM_TYPE.to_string(),
            id: None,
            data: BTreeMap::new(),
        }
    }

    /// Unplaced template; the position is a placeholder until placement.
    pub fn template(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn with_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self
    }

    pub fn with_id(mut self, room_id: impl Into<String>) -> Self {
        self.id = Some(room_id.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Explicit id, or `room_{x}_{y}` derived from the current position.
    pub fn room_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("room_{}_{}", self.x, self.y),
        }
    }

    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self, room_id: &str) -> bool {
        match &self.id {
            Some(id) => id == room_id,
            None => self.room_id() == room_id,
        }
    }

    pub fn origin(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.x <= pos.x && pos.x < self.right() && self.y <= pos.y && pos.y < self.bottom()
    }

    pub fn overlaps(&self, other: &Room) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Same size and metadata as `self`, moved to `(x, y)`.
    pub(crate) fn placed_at(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..self.clone() }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (x, right) = (self.x, self.right());
        (self.y..self.bottom()).flat_map(move |y| (x..right).map(move |x| Pos::new(x, y)))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' ({},{}) {}x{} type={}",
            self.room_id(),
            self.x,
            self.y,
            self.width,
            self.height,
            self.room_type
        )
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct RoomRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(default = "default_room_type")]
    room_type: String,
    /// Only explicit ids are written; anonymous rooms re-derive theirs from position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    room_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<String, Value>,
}

fn default_room_type() -> String {
    DEFAULT_ROOM_TYPE.to_string()
}

impl TryFrom<RoomRecord> for Room {
    type Error = SerializationError;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        if record.width <= 0 || record.height <= 0 {
            return Err(SerializationError::InvalidRoomSize {
                room_id: record.room_id.unwrap_or_default(),
                width: record.width,
                height: record.height,
            });
        }
        Ok(Self {
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            room_type: record.room_type,
            id: record.room_id,
            data: record.data,
        })
    }
}

impl From<Room> for RoomRecord {
    fn from(room: Room) -> Self {
        Self {
            x: room.x,
            y: room.y,
            width: room.width,
            height: room.height,
            room_type: room.room_type,
            room_id: room.id,
            data: room.data,
        }
    }
}
