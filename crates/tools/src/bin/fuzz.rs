use anyhow::Result;
use clap::Parser;
use dungeon_core::mapgen::presets::quest_room_template;
use dungeon_core::{DungeonGenerator, GenerationAlgorithm, GenerationConfig, Grid, LogEvent, Room};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    cases: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn between(rng: &mut ChaCha8Rng, min: u64, max: u64) -> u64 {
    min + rng.next_u64() % (max - min + 1)
}

fn random_config(rng: &mut ChaCha8Rng) -> GenerationConfig {
    let algorithm = choose(
        rng,
        &[
            GenerationAlgorithm::RandomRooms,
            GenerationAlgorithm::CellularAutomata,
            GenerationAlgorithm::BinarySpacePartition,
        ],
    );
    let min_room = between(rng, 1, 8) as usize;
    let max_room = min_room + between(rng, 0, 10) as usize;
    GenerationConfig::new(between(rng, 0, 64) as usize, between(rng, 0, 64) as usize)
        .with_algorithm(algorithm)
        .with_seed(rng.next_u64())
        .with_room_sizes(min_room, max_room)
        .with_target_room_count(between(rng, 0, 30) as usize)
        .with_cave_parameters(between(rng, 0, 100) as f64 / 100.0, between(rng, 0, 8) as u32)
}

fn check_invariants(
    config: &GenerationConfig,
    grid: &Grid,
    rooms: &[Room],
    quest_count: usize,
    log: &[LogEvent],
) {
    assert_eq!((grid.width(), grid.height()), (config.width, config.height));

    let generated = &rooms[..rooms.len() - quest_count];
    let disjoint = matches!(
        config.algorithm,
        GenerationAlgorithm::RandomRooms | GenerationAlgorithm::BinarySpacePartition
    );
    for (index, room) in generated.iter().enumerate() {
        assert!(room.width > 0 && room.height > 0, "Invariant failed: empty room {room}");
        // Cave rooms are bounding boxes and may enclose rock.
        if disjoint {
            assert!(
                grid.is_region_walkable(room.origin(), room.width, room.height),
                "Invariant failed: room {room} not carved ({config})"
            );
            for other in &generated[index + 1..] {
                assert!(!room.overlaps(other), "Invariant failed: {room} overlaps {other}");
            }
        }
    }

    let mut placed_quests: Vec<&Room> = Vec::new();
    for quest in &rooms[rooms.len() - quest_count..] {
        let quest_id = quest.room_id();
        let reported_placed = log.iter().any(|event| {
            matches!(event, LogEvent::QuestRoomPlaced { room_id, .. } if *room_id == quest_id)
        });
        if !reported_placed {
            assert_eq!(
                (quest.x, quest.y),
                (0, 0),
                "Invariant failed: unplaced quest room {quest} moved ({config})"
            );
            continue;
        }
        assert!(
            grid.is_region_walkable(quest.origin(), quest.width, quest.height),
            "Invariant failed: quest room {quest} not walkable ({config})"
        );
        for other in generated.iter().chain(placed_quests.iter().copied()) {
            assert!(
                !other.overlaps(quest),
                "Invariant failed: quest room {quest} overlaps {other}"
            );
        }
        placed_quests.push(quest);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting dungeon fuzz harness on seed {} for {} cases...", args.seed, args.cases);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut generator = DungeonGenerator::new();

    for case in 0..args.cases {
        let config = random_config(&mut rng);
        let quest_rooms: Vec<Room> = (0..between(&mut rng, 0, 3))
            .map(|index| {
                let size = between(&mut rng, 1, 6) as i32;
                let quest_id = format!("quest_{case}_{index}");
                quest_room_template(size, size, "quest", Some(quest_id.as_str()))
            })
            .collect();

        let (grid, rooms) = generator.generate(&config, &quest_rooms);
        check_invariants(&config, &grid, &rooms, quest_rooms.len(), generator.log());

        let replay = generator.generate(&config, &quest_rooms);
        assert!(
            replay == (grid, rooms),
            "Invariant failed: seeded run not reproducible ({config})"
        );
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
