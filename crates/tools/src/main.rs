mod config_file;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config_file::{Overrides, resolve_config};
use dungeon_core::mapgen::presets::quest_room_template;
use dungeon_core::{
    DungeonGenerator, DungeonPreset, DungeonSnapshot, GenerationAlgorithm, Grid, LogEvent, Room,
};

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon and print it as ASCII", long_about = None)]
struct Args {
    /// Preset to start from: small, medium, large, cave or castle
    #[arg(short, long)]
    preset: Option<DungeonPreset>,
    /// TOML generation config; takes precedence over --preset
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// RANDOM_ROOMS, CELLULAR_AUTOMATA, BINARY_SPACE_PARTITION or CUSTOM
    #[arg(short, long)]
    algorithm: Option<GenerationAlgorithm>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Target number of rooms for the room-based algorithms
    #[arg(short, long)]
    rooms: Option<usize>,
    /// Place a 5x5 quest room with this id (repeatable)
    #[arg(short, long = "quest")]
    quests: Vec<String>,
    /// Write the config, grid and rooms as JSON to this path
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Print the generation log
    #[arg(short, long)]
    verbose: bool,
}

fn render(grid: &Grid) -> String {
    grid.rows()
        .map(|row| row.iter().map(|tile| tile.kind.glyph()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        algorithm: args.algorithm,
        width: args.width,
        height: args.height,
        seed: args.seed,
        rooms: args.rooms,
    };
    let config = resolve_config(args.config.as_deref(), args.preset, &overrides)?;
    let quest_rooms: Vec<Room> = args
        .quests
        .iter()
        .map(|id| quest_room_template(5, 5, "quest", Some(id.as_str())))
        .collect();

    let mut generator = DungeonGenerator::new();
    let (grid, rooms) = generator.generate(&config, &quest_rooms);

    println!("{}", render(&grid));
    println!("Config: {config}");
    println!("Rooms: {} ({} walkable tiles)", rooms.len(), grid.walkable_count());
    println!("Accessible rooms: {}", generator.get_accessible_rooms(&grid, &rooms).len());
    for event in generator.log() {
        match event {
            LogEvent::QuestRoomPlaced { room_id, x, y, .. } => {
                println!("Quest room {room_id}: placed at ({x}, {y})");
            }
            LogEvent::QuestRoomUnplaced { room_id } => {
                println!("Quest room {room_id}: no open space found, left unplaced");
            }
            _ => {}
        }
    }

    if args.verbose {
        for event in generator.log() {
            println!("{event:?}");
        }
    }

    if let Some(path) = args.json {
        DungeonSnapshot::new(config, grid, rooms)
            .write_atomic(&path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
