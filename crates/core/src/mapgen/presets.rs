//! Ready-made configurations and lookup helpers over generated room lists.

use std::fmt;
use std::str::FromStr;

use super::config::{GenerationAlgorithm, GenerationConfig};
use super::room::Room;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DungeonPreset {
    /// 20x20, up to 8 random rooms.
    Small,
    /// 30x30, up to 15 random rooms.
    Medium,
    /// 50x50, up to 30 random rooms.
    Large,
    /// 40x40 cellular-automata cave.
    Cave,
    /// 40x40 binary space partition.
    Castle,
}

impl DungeonPreset {
    pub const ALL: [Self; 5] = [Self::Small, Self::Medium, Self::Large, Self::Cave, Self::Castle];

    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Cave => "cave",
            Self::Castle => "castle",
        }
    }

    pub fn config(self, seed: Option<u64>) -> GenerationConfig {
        let base = match self {
            Self::Small => GenerationConfig::new(20, 20).with_target_room_count(8),
            Self::Medium => GenerationConfig::new(30, 30).with_target_room_count(15),
            Self::Large => GenerationConfig::new(50, 50).with_target_room_count(30),
            Self::Cave => GenerationConfig::new(40, 40)
                .with_algorithm(GenerationAlgorithm::CellularAutomata),
            Self::Castle => GenerationConfig::new(40, 40)
                .with_algorithm(GenerationAlgorithm::BinarySpacePartition),
        };
        GenerationConfig { name: self.name().to_string(), seed, ..base }
    }
}

impl fmt::Display for DungeonPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DungeonPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == normalized)
            .ok_or_else(|| {
                format!("unknown preset '{s}', expected small, medium, large, cave or castle")
            })
    }
}

/// Unplaced template for [`place_quest_rooms`](super::place_quest_rooms).
pub fn quest_room_template(
    width: i32,
    height: i32,
    room_type: &str,
    room_id: Option<&str>,
) -> Room {
    let template = Room::template(width, height).with_type(room_type);
    match room_id {
        Some(room_id) => template.with_id(room_id),
        None => template,
    }
}

/// First room whose resolved id equals `room_id`.
pub fn find_room_by_id<'a>(rooms: &'a [Room], room_id: &str) -> Option<&'a Room> {
    rooms.iter().find(|room| room.has_id(room_id))
}

pub fn rooms_by_type<'a>(rooms: &'a [Room], room_type: &str) -> Vec<&'a Room> {
    rooms.iter().filter(|room| room.room_type == room_type).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_documented_sizes() {
        let small = DungeonPreset::Small.config(Some(1));
        assert_eq!((small.width, small.height, small.target_room_count), (20, 20, 8));
        assert_eq!(small.seed, Some(1));
        let large = DungeonPreset::Large.config(None);
        assert_eq!((large.width, large.height, large.target_room_count), (50, 50, 30));
        assert_eq!(
            DungeonPreset::Cave.config(None).algorithm,
            GenerationAlgorithm::CellularAutomata
        );
        assert_eq!(
            DungeonPreset::Castle.config(None).algorithm,
            GenerationAlgorithm::BinarySpacePartition
        );
        for preset in DungeonPreset::ALL {
            assert!(preset.config(None).validate().is_ok(), "{preset} fails validation");
        }
    }

    #[test]
    fn preset_names_parse_back() {
        for preset in DungeonPreset::ALL {
            assert_eq!(preset.name().parse::<DungeonPreset>(), Ok(preset));
        }
        assert_eq!(" Castle ".parse::<DungeonPreset>(), Ok(DungeonPreset::Castle));
        assert!("huge".parse::<DungeonPreset>().is_err());
    }

    #[test]
    fn lookups_use_resolved_ids_and_types() {
        let rooms = vec![
            Room::new(1, 1, 3, 3),
            Room::new(6, 1, 3, 3).with_type("quest").with_id("altar"),
            Room::new(1, 6, 3, 3).with_type("quest"),
        ];
        assert_eq!(find_room_by_id(&rooms, "altar"), Some(&rooms[1]));
        assert_eq!(find_room_by_id(&rooms, "room_1_6"), Some(&rooms[2]));
        assert_eq!(find_room_by_id(&rooms, "missing"), None);
        assert_eq!(rooms_by_type(&rooms, "quest"), vec![&rooms[1], &rooms[2]]);
        assert_eq!(rooms_by_type(&rooms, "normal"), vec![&rooms[0]]);
    }

    #[test]
    fn quest_template_is_unplaced() {
        let template = quest_room_template(5, 4, "boss", Some("lair"));
        assert_eq!((template.x, template.y, template.width, template.height), (0, 0, 5, 4));
        assert_eq!(template.room_type, "boss");
        assert_eq!(template.explicit_id(), Some("lair"));
        assert_eq!(quest_room_template(5, 5, "quest", None).explicit_id(), None);
    }
}
