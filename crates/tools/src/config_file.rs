//! Resolves the generation config from an optional TOML file, a preset and flag overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::{DungeonPreset, GenerationAlgorithm, GenerationConfig};

pub fn load_config(path: &Path) -> Result<GenerationConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse generation config TOML: {}", path.display()))
}

/// Command-line overrides applied on top of the file or preset.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub algorithm: Option<GenerationAlgorithm>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub seed: Option<u64>,
    pub rooms: Option<usize>,
}

/// File wins over preset; flags win over both.
pub fn resolve_config(
    file: Option<&Path>,
    preset: Option<DungeonPreset>,
    overrides: &Overrides,
) -> Result<GenerationConfig> {
    let mut config = match (file, preset) {
        (Some(path), _) => load_config(path)?,
        (None, Some(preset)) => preset.config(None),
        (None, None) => GenerationConfig::default(),
    };

    if let Some(algorithm) = overrides.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(width) = overrides.width {
        config.width = width;
    }
    if let Some(height) = overrides.height {
        config.height = height;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(rooms) = overrides.rooms {
        config.target_room_count = rooms;
    }

    config.validate().context("Generation config is inconsistent")?;
    Ok(config)
}
