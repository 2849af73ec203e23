use dungeon_core::{
    DungeonPreset, DungeonSnapshot, GenerationConfig, Grid, KeyValue, Pos, Room,
    SerializationError, Tile, TileFlags, TileType, generate_dungeon,
};
use proptest::option;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_generated_dungeon_round_trips_through_key_value_form() {
    for preset in DungeonPreset::ALL {
        let config = preset.config(Some(31));
        let (grid, rooms) = generate_dungeon(&config);

        let decoded_grid = Grid::from_value(grid.to_value().unwrap()).unwrap();
        assert_eq!(decoded_grid, grid, "{preset} grid changed on round trip");

        for room in &rooms {
            let decoded = Room::from_value(room.to_value().unwrap()).unwrap();
            assert_eq!(&decoded, room, "{preset} room changed on round trip");
            assert_eq!(decoded.explicit_id(), room.explicit_id());
        }
    }
}

#[test]
fn test_snapshot_value_round_trips() {
    let config = GenerationConfig::new(18, 14).with_seed(4);
    let (grid, rooms) = generate_dungeon(&config);
    let snapshot = DungeonSnapshot::new(config, grid, rooms);

    let encoded = snapshot.to_value().unwrap();
    let decoded = DungeonSnapshot::from_value(encoded.clone()).unwrap();
    assert_eq!(decoded.to_value().unwrap(), encoded);
}

#[test]
fn test_room_with_data_keeps_explicit_id() {
    let room = Room::new(3, 4, 5, 6)
        .with_type("boss")
        .with_id("dragon_lair")
        .with_data("difficulty", json!({"tier": 3, "elite": true}));
    let decoded = Room::from_value(room.to_value().unwrap()).unwrap();
    assert_eq!(decoded, room);
}

#[test]
fn test_malformed_values_are_rejected() {
    let missing_height = json!({"width": 1, "tiles": [[{"type": "WALL", "flags": 0}]]});
    assert!(matches!(Grid::from_value(missing_height), Err(SerializationError::Json(_))));

    let wrong_row_count =
        json!({"width": 1, "height": 2, "tiles": [[{"type": "WALL", "flags": 0}]]});
    assert!(Grid::from_value(wrong_row_count).is_err());

    assert!(Room::from_value(json!({"x": 0, "y": 0, "width": -1, "height": 3})).is_err());
    assert!(GenerationConfig::from_value(json!({"width": "wide"})).is_err());
}

fn tile_strategy() -> impl Strategy<Value = Tile> {
    let kind = prop_oneof![
        Just(TileType::Floor),
        Just(TileType::Wall),
        Just(TileType::Entrance),
        Just(TileType::Exit),
    ];
    let position = option::of((-50_i32..50, -50_i32..50));
    (kind, 0_u8..8, position).prop_map(|(kind, bits, position)| {
        let tile = Tile::new(kind, TileFlags::from_bits_truncate(bits));
        match position {
            Some((x, y)) => tile.with_position(Pos::new(x, y)),
            None => tile,
        }
    })
}

proptest! {
    #[test]
    fn tiles_survive_key_value_form(tile in tile_strategy()) {
        let decoded = Tile::from_value(tile.to_value().unwrap()).unwrap();
        prop_assert_eq!(decoded, tile);
    }
}
