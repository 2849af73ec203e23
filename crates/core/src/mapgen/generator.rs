//! Generation orchestration: algorithm dispatch, quest placement and event delivery.

use slotmap::SlotMap;

use crate::grid::Grid;

use super::bsp::generate_bsp;
use super::caves::generate_caves;
use super::config::{GenerationAlgorithm, GenerationConfig};
use super::events::{GenerationEvent, ListenerId, LogEvent};
use super::layout::generate_random_rooms;
use super::quests::{QuestOutcome, accessible_rooms, place_quest_rooms};
use super::room::Room;
use super::seed::DungeonRng;

/// Caller-supplied strategy run for [`GenerationAlgorithm::Custom`].
pub type CustomLayout = Box<dyn FnMut(&GenerationConfig, &mut DungeonRng) -> (Grid, Vec<Room>)>;

type Listener = Box<dyn FnMut(&GenerationEvent<'_>)>;

/// Runs complete generations. Holds no layout state between calls; only listeners,
/// the optional custom strategy, and the log of the most recent run.
#[derive(Default)]
pub struct DungeonGenerator {
    listeners: SlotMap<ListenerId, Listener>,
    // Slot keys are reused, so delivery order is tracked separately.
    order: Vec<ListenerId>,
    custom_layout: Option<CustomLayout>,
    log: Vec<LogEvent>,
}

impl DungeonGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&GenerationEvent<'_>) + 'static,
    {
        let id = self.listeners.insert(Box::new(listener));
        self.order.push(id);
        id
    }

    /// Returns `false` if `id` was already removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.order.retain(|registered| *registered != id);
        self.listeners.remove(id).is_some()
    }

    pub fn set_custom_layout<F>(&mut self, layout: F)
    where
        F: FnMut(&GenerationConfig, &mut DungeonRng) -> (Grid, Vec<Room>) + 'static,
    {
        self.custom_layout = Some(Box::new(layout));
    }

    pub fn clear_custom_layout(&mut self) {
        self.custom_layout = None;
    }

    /// Events recorded by the most recent [`generate`](Self::generate) call.
    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// One complete run.
    ///
    /// The random stream is derived from `config.seed` alone, so equal configs with a
    /// seed give equal output. Quest templates that cannot be placed are appended
    /// unchanged and reported through [`GenerationEvent::QuestRoomUnplaced`].
    pub fn generate(
        &mut self,
        config: &GenerationConfig,
        quest_rooms: &[Room],
    ) -> (Grid, Vec<Room>) {
        self.log.clear();
        let mut rng = DungeonRng::for_seed(config.seed);
        self.emit(GenerationEvent::Started(config));

        let (mut grid, mut rooms) = match config.algorithm {
            GenerationAlgorithm::RandomRooms => generate_random_rooms(config, &mut rng),
            GenerationAlgorithm::CellularAutomata => generate_caves(config, &mut rng),
            GenerationAlgorithm::BinarySpacePartition => generate_bsp(config, &mut rng),
            GenerationAlgorithm::Custom => match self.custom_layout.as_mut() {
                Some(layout) => layout(config, &mut rng),
                None => generate_random_rooms(config, &mut rng),
            },
        };
        for room in &rooms {
            self.emit(GenerationEvent::RoomPlaced(room));
        }

        if !quest_rooms.is_empty() {
            let outcomes = place_quest_rooms(&mut grid, &rooms, quest_rooms, &mut rng);
            for outcome in outcomes {
                let event = match &outcome {
                    QuestOutcome::Placed(room) => GenerationEvent::QuestRoomPlaced(room),
                    QuestOutcome::Unplaced(room) => GenerationEvent::QuestRoomUnplaced(room),
                };
                self.emit(event);
                rooms.push(outcome.into_room());
            }
        }

        self.emit(GenerationEvent::Completed { grid: &grid, rooms: &rooms });
        (grid, rooms)
    }

    /// Rooms whose whole footprint is walkable in `grid`.
    pub fn get_accessible_rooms<'a>(&self, grid: &Grid, rooms: &'a [Room]) -> Vec<&'a Room> {
        accessible_rooms(grid, rooms)
    }

    fn emit(&mut self, event: GenerationEvent<'_>) {
        self.log.push(LogEvent::from(&event));
        for id in &self.order {
            if let Some(listener) = self.listeners.get_mut(*id) {
                listener(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::tile::Tile;

    fn seeded(width: usize, height: usize, seed: u64) -> GenerationConfig {
        GenerationConfig::new(width, height).with_seed(seed)
    }

    #[test]
    fn equal_seeded_configs_give_equal_output() {
        let config = seeded(20, 20, 42);
        let mut generator = DungeonGenerator::new();
        let first = generator.generate(&config, &[]);
        let second = generator.generate(&config, &[]);
        assert_eq!(first, second);
        assert_eq!(first, DungeonGenerator::new().generate(&config, &[]));
    }

    #[test]
    fn log_is_bracketed_and_reset_per_call() {
        let config = seeded(30, 30, 8);
        let mut generator = DungeonGenerator::new();
        let (grid, rooms) = generator.generate(&config, &[]);

        let log = generator.log();
        assert_eq!(
            log.first(),
            Some(&LogEvent::GenerationStarted {
                algorithm: GenerationAlgorithm::RandomRooms,
                seed: Some(8),
                width: 30,
                height: 30,
            })
        );
        assert_eq!(
            log.last(),
            Some(&LogEvent::GenerationCompleted {
                room_count: rooms.len(),
                walkable_tiles: grid.walkable_count(),
            })
        );
        let placed =
            log.iter().filter(|event| matches!(event, LogEvent::RoomPlaced { .. })).count();
        assert_eq!(placed, rooms.len());
        assert_eq!(log.len(), rooms.len() + 2);

        generator.generate(&config, &[]);
        assert_eq!(generator.log().len(), rooms.len() + 2);
    }

    #[test]
    fn listeners_run_in_registration_order_until_removed() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut generator = DungeonGenerator::new();

        let first_calls = Rc::clone(&calls);
        let first = generator.add_listener(move |event| {
            if let GenerationEvent::Started(_) = event {
                first_calls.borrow_mut().push("first");
            }
        });
        let second_calls = Rc::clone(&calls);
        generator.add_listener(move |event| {
            if let GenerationEvent::Started(_) = event {
                second_calls.borrow_mut().push("second");
            }
        });

        generator.generate(&seeded(20, 20, 1), &[]);
        assert_eq!(*calls.borrow(), vec!["first", "second"]);

        assert!(generator.remove_listener(first));
        assert!(!generator.remove_listener(first));
        let third_calls = Rc::clone(&calls);
        generator.add_listener(move |event| {
            if let GenerationEvent::Started(_) = event {
                third_calls.borrow_mut().push("third");
            }
        });
        generator.generate(&seeded(20, 20, 1), &[]);
        assert_eq!(*calls.borrow(), vec!["first", "second", "second", "third"]);
    }

    #[test]
    fn completed_listener_sees_final_rooms() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut generator = DungeonGenerator::new();
        generator.add_listener(move |event| {
            if let GenerationEvent::Completed { grid, rooms } = event {
                *sink.borrow_mut() = Some((grid.width(), rooms.len()));
            }
        });
        let (grid, rooms) = generator.generate(&seeded(25, 25, 5), &[]);
        assert_eq!(*seen.borrow(), Some((grid.width(), rooms.len())));
    }

    #[test]
    fn custom_layout_is_used_and_falls_back_to_random_rooms() {
        let config = seeded(20, 20, 3).with_algorithm(GenerationAlgorithm::Custom);
        let random = seeded(20, 20, 3);

        let mut generator = DungeonGenerator::new();
        assert_eq!(generator.generate(&config, &[]), generator.generate(&random, &[]));

        generator.set_custom_layout(|config, _rng| {
            let grid = Grid::new(config.width, config.height);
            (grid, vec![Room::new(2, 2, 3, 3).with_type("arena")])
        });
        let (grid, rooms) = generator.generate(&config, &[]);
        assert_eq!(grid.walkable_count(), 400);
        assert_eq!(rooms[0].room_type, "arena");

        generator.clear_custom_layout();
        assert_eq!(generator.generate(&config, &[]), generator.generate(&random, &[]));
    }

    #[test]
    fn quest_rooms_are_appended_with_events() {
        let config = seeded(24, 24, 17).with_algorithm(GenerationAlgorithm::Custom);
        let mut generator = DungeonGenerator::new();
        generator.set_custom_layout(|config, _rng| {
            let mut grid = Grid::new(config.width, config.height);
            grid.fill_borders(Tile::wall());
            (grid, Vec::new())
        });

        let templates = [
            Room::template(5, 5).with_type("quest").with_id("shrine"),
            Room::template(40, 40).with_id("too_big"),
        ];
        let (grid, rooms) = generator.generate(&config, &templates);

        assert_eq!(rooms.len(), 2);
        let shrine = &rooms[0];
        assert_eq!(shrine.room_id(), "shrine");
        assert!(grid.is_region_walkable(shrine.origin(), 5, 5));
        assert_eq!(rooms[1], templates[1]);
        assert_eq!(generator.get_accessible_rooms(&grid, &rooms), vec![shrine]);

        let log = generator.log();
        assert!(
            matches!(&log[1], LogEvent::QuestRoomPlaced { room_id, .. } if room_id == "shrine")
        );
        assert_eq!(log[2], LogEvent::QuestRoomUnplaced { room_id: "too_big".to_string() });
    }
}
