//! Key/value boundary: JSON values for tiles, rooms, grids and configs, plus
//! snapshot files holding one complete generation.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SerializationError;
use crate::grid::Grid;
use crate::mapgen::{GenerationConfig, Room};
use crate::tile::Tile;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Conversion to and from a `serde_json::Value` tree.
///
/// Decoding checks field presence and shape explicitly; a value produced by
/// `to_value` always decodes to an equal object.
pub trait KeyValue: Serialize + DeserializeOwned {
    fn to_value(&self) -> Result<Value, SerializationError> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_value(value: Value) -> Result<Self, SerializationError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl KeyValue for Tile {}
impl KeyValue for Room {}
impl KeyValue for Grid {}
impl KeyValue for GenerationConfig {}
impl KeyValue for DungeonSnapshot {}

/// `{"width", "height", "tiles": [[tile, ...], ...]}` with rows top to bottom.
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct GridRecord {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
}

impl From<Grid> for GridRecord {
    fn from(grid: Grid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            tiles: grid.rows().map(<[Tile]>::to_vec).collect(),
        }
    }
}

impl TryFrom<GridRecord> for Grid {
    type Error = SerializationError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let shape_matches = record.tiles.len() == record.height
            && record.tiles.iter().all(|row| row.len() == record.width);
        if !shape_matches {
            return Err(SerializationError::GridShapeMismatch {
                width: record.width,
                height: record.height,
            });
        }
        let tiles = record.tiles.into_iter().flatten().collect();
        Ok(Grid::from_rows(record.width, record.height, tiles))
    }
}

/// Config, grid and rooms of one run, saved as pretty JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonSnapshot {
    pub format_version: u32,
    pub config: GenerationConfig,
    pub grid: Grid,
    pub rooms: Vec<Room>,
}

impl DungeonSnapshot {
    pub fn new(config: GenerationConfig, grid: Grid, rooms: Vec<Room>) -> Self {
        Self { format_version: SNAPSHOT_FORMAT_VERSION, config, grid, rooms }
    }

    /// Writes to a sibling temp file, then renames over `path`.
    pub fn write_atomic(&self, path: &Path) -> Result<(), SerializationError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, SerializationError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::mapgen::{DungeonPreset, generate_dungeon};
    use crate::tile::{TileFlags, TileType};
    use crate::types::Pos;

    #[test]
    fn tile_value_uses_stable_names() {
        let tile = Tile::new(TileType::Exit, TileFlags::WALKABLE | TileFlags::IS_EXIT)
            .with_position(Pos::new(3, 4));
        let value = tile.to_value().unwrap();
        assert_eq!(value, json!({"type": "EXIT", "flags": 5, "x": 3, "y": 4}));
        assert_eq!(Tile::from_value(value).unwrap(), tile);
    }

    #[test]
    fn unknown_type_name_or_flag_bits_are_rejected() {
        assert!(Tile::from_value(json!({"type": "LAVA", "flags": 0})).is_err());
        assert!(Tile::from_value(json!({"type": "FLOOR", "flags": 64})).is_err());
        assert!(Tile::from_value(json!({"type": "FLOOR"})).is_err());
        assert!(Tile::from_value(json!({"type": "FLOOR", "flags": 1, "x": 2})).is_err());
    }

    #[test]
    fn grid_value_is_nested_rows() {
        let mut grid = Grid::new(3, 2);
        grid.set_tile(Pos::new(2, 1), Tile::wall()).unwrap();
        let value = grid.to_value().unwrap();
        assert_eq!(value["width"], json!(3));
        assert_eq!(value["tiles"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["tiles"][1][2]["type"], json!("WALL"));
        assert_eq!(Grid::from_value(value).unwrap(), grid);
    }

    #[test]
    fn ragged_grid_rows_are_rejected() {
        let floor = json!({"type": "FLOOR", "flags": 1});
        let value = json!({
            "width": 2,
            "height": 2,
            "tiles": [[floor.clone(), floor.clone()], [floor]]
        });
        assert!(matches!(
            Grid::from_value(value),
            Err(SerializationError::Json(_))
        ));
    }

    #[test]
    fn zero_width_grid_round_trips() {
        let grid = Grid::new(0, 3);
        assert_eq!(Grid::from_value(grid.to_value().unwrap()).unwrap(), grid);
    }

    #[test]
    fn config_round_trips() {
        let config = DungeonPreset::Cave.config(Some(9));
        assert_eq!(GenerationConfig::from_value(config.to_value().unwrap()).unwrap(), config);
    }

    #[test]
    fn snapshot_atomic_write_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshots").join("castle.json");

        let config = DungeonPreset::Castle.config(Some(77));
        let (grid, rooms) = generate_dungeon(&config);
        let snapshot = DungeonSnapshot::new(config, grid, rooms);

        snapshot.write_atomic(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = DungeonSnapshot::load(&path).unwrap();
        assert_eq!(loaded.format_version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(loaded.grid, snapshot.grid);
        assert_eq!(loaded.config, snapshot.config);
        assert_eq!(loaded.rooms, snapshot.rooms);
    }

    #[test]
    fn missing_snapshot_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            DungeonSnapshot::load(&dir.path().join("absent.json")),
            Err(SerializationError::Io(_))
        ));
    }
}
