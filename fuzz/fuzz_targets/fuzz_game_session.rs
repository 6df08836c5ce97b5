#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rampart::game::{AttackEvent, BreachEvent, Events, Phase, PlayerStats, SpawnEvent, TurnInfo};
use rampart::{Coord, Frame, Side, Strategy, Tuning, Turn, UnitCatalog, UnitType};

/// One structured event, kept small so the fuzzer explores sequences.
#[derive(Arbitrary, Debug)]
enum RawEvent {
    Attack { x: u8, y: u8, class: u8, actor: u8, ours: bool },
    Spawn { class: u8, ours: bool },
    Breach { x: u8, y: u8, ours: bool },
}

/// A turn: resources at decision time, then a few sub-frames.
#[derive(Arbitrary, Debug)]
struct RawTurn {
    own_structure: u16,
    own_unit: u16,
    their_unit: u16,
    frames: Vec<(i16, Vec<RawEvent>)>,
}

const fn side(ours: bool) -> Side {
    if ours { Side::Own } else { Side::Opponent }
}

fn events(raw: &[RawEvent]) -> Events {
    let mut events = Events::default();
    for event in raw {
        match *event {
            RawEvent::Attack { x, y, class, actor, ours } => events.attacks.push(AttackEvent {
                target: Coord::new(x % 28, y % 28),
                class: UnitType::from_class_id(class % 8),
                actor_id: actor.to_string(),
                owner: side(ours),
            }),
            RawEvent::Spawn { class, ours } => events.spawns.push(SpawnEvent {
                at: Coord::new(13, 27),
                class: UnitType::from_class_id(class % 8),
                owner: side(ours),
            }),
            RawEvent::Breach { x, y, ours } => events.breaches.push(BreachEvent {
                at: Coord::new(x % 28, y % 28),
                owner: side(ours),
            }),
        }
    }
    events
}

fuzz_target!(|turns: Vec<RawTurn>| {
    let catalog = UnitCatalog::default();
    let mut strategy = Strategy::new(Tuning::default(), catalog.clone());

    for (number, raw) in (0u32..).zip(turns.iter().take(50)) {
        let stats = [
            PlayerStats {
                health: 30.0,
                structure: f64::from(raw.own_structure % 200),
                unit: f64::from(raw.own_unit % 200),
            },
            PlayerStats {
                health: 30.0,
                structure: 0.0,
                unit: f64::from(raw.their_unit % 200),
            },
        ];
        let mut turn = Turn::new(&catalog, number, stats, Vec::new());
        strategy.on_turn(&mut turn, number);
        assert!(strategy.tier_order().is_permutation_of(5));
        assert!(turn.submission().is_ok());

        for (sub_frame, raw_events) in raw.frames.iter().take(20) {
            strategy.on_action_frame(&Frame {
                info: TurnInfo {
                    phase: Phase::Action,
                    turn: number,
                    sub_frame: i64::from(*sub_frame),
                },
                stats,
                structures: Vec::new(),
                events: events(raw_events),
            });
        }
    }
});
