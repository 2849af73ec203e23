//! Parameters for one generation run.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationAlgorithm {
    /// Recursive splitting into one room per leaf; castle-like layouts.
    BinarySpacePartition,
    /// Noise smoothed by neighbor majority; cave-like layouts.
    CellularAutomata,
    #[default]
    RandomRooms,
    /// Caller-registered layout; falls back to random rooms when none is set.
    Custom,
}

impl GenerationAlgorithm {
    pub const ALL: [Self; 4] =
        [Self::BinarySpacePartition, Self::CellularAutomata, Self::RandomRooms, Self::Custom];

    pub fn name(self) -> &'static str {
        match self {
            Self::BinarySpacePartition => "BINARY_SPACE_PARTITION",
            Self::CellularAutomata => "CELLULAR_AUTOMATA",
            Self::RandomRooms => "RANDOM_ROOMS",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for GenerationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GenerationAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| format!("unknown generation algorithm '{s}'"))
    }
}

/// Immutable parameter bag. Keys missing from serialized input take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub algorithm: GenerationAlgorithm,
    /// `None` draws a fresh seed for every run.
    pub seed: Option<u64>,
    pub min_room_size: usize,
    pub max_room_size: usize,
    pub target_room_count: usize,
    pub wall_fill_probability: f64,
    pub iterations: u32,
    /// Free-form parameters for custom layouts.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            name: "dungeon".to_string(),
            width: 30,
            height: 30,
            algorithm: GenerationAlgorithm::RandomRooms,
            seed: None,
            min_room_size: 4,
            max_room_size: 12,
            target_room_count: 15,
            wall_fill_probability: 0.45,
            iterations: 5,
            extra: BTreeMap::new(),
        }
    }
}

impl GenerationConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_algorithm(mut self, algorithm: GenerationAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_room_sizes(mut self, min_room_size: usize, max_room_size: usize) -> Self {
        self.min_room_size = min_room_size;
        self.max_room_size = max_room_size;
        self
    }

    pub fn with_target_room_count(mut self, target_room_count: usize) -> Self {
        self.target_room_count = target_room_count;
        self
    }

    pub fn with_cave_parameters(mut self, wall_fill_probability: f64, iterations: u32) -> Self {
        self.wall_fill_probability = wall_fill_probability;
        self.iterations = iterations;
        self
    }

    /// Opt-in consistency check. Generation itself never calls this and degrades
    /// to fewer (possibly zero) rooms on a bad configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyDimensions { width: self.width, height: self.height });
        }
        if self.min_room_size == 0 {
            return Err(ConfigError::ZeroRoomSize);
        }
        if self.min_room_size > self.max_room_size {
            return Err(ConfigError::InvertedRoomSizes {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        if self.min_room_size + 2 > self.width || self.min_room_size + 2 > self.height {
            return Err(ConfigError::RoomDoesNotFit {
                room_size: self.min_room_size,
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.wall_fill_probability) {
            return Err(ConfigError::InvalidWallProbability(self.wall_fill_probability));
        }
        Ok(())
    }
}

impl fmt::Display for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}x{} algo={}", self.name, self.width, self.height, self.algorithm)?;
        if let Some(seed) = self.seed {
            write!(f, " seed={seed}")?;
        }
        Ok(())
    }
}
