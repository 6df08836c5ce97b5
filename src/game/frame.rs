//! Parsing of the per-turn and per-sub-frame JSON objects sent by the host.
//!
//! Event sections are positional arrays whose layout is fixed by the host;
//! accessors here index them directly and turn any deviation into a
//! [`FrameError`].

use serde_json::Value;

use crate::error::FrameError;
use crate::game::{Coord, Side, Structure, UnitType};
use crate::game::units::UPGRADE_CLASS_ID;

/// Which part of the turn cycle a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// We are asked for our builds and deployments.
    Decision,
    /// One simulated sub-frame of the turn just submitted.
    Action,
    /// The game is over.
    GameOver,
}

/// The `turnInfo` header of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnInfo {
    /// Phase of this frame.
    pub phase: Phase,
    /// Turn number.
    pub turn: u32,
    /// Sub-frame index within the turn (-1 outside the action phase).
    pub sub_frame: i64,
}

/// Health and resources of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    /// Remaining health; each breach costs some.
    pub health: f64,
    /// Structure-resource on hand.
    pub structure: f64,
    /// Unit-resource on hand.
    pub unit: f64,
}

/// A unit attacking something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackEvent {
    /// What was attacked.
    pub target: Coord,
    /// Class of the attacker, if it is a playable class.
    pub class: Option<UnitType>,
    /// Host-unique id of the attacker.
    pub actor_id: String,
    /// Owner of the attacker.
    pub owner: Side,
}

/// A unit being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnEvent {
    /// Where it was placed.
    pub at: Coord,
    /// Class of the unit, if it is a playable class.
    pub class: Option<UnitType>,
    /// Owner of the unit.
    pub owner: Side,
}

/// A mobile unit reaching the far edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreachEvent {
    /// Edge cell that was reached.
    pub at: Coord,
    /// Owner of the unit that got through.
    pub owner: Side,
}

/// The event sections the strategy consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    /// `attack` section.
    pub attacks: Vec<AttackEvent>,
    /// `spawn` section.
    pub spawns: Vec<SpawnEvent>,
    /// `breach` section.
    pub breaches: Vec<BreachEvent>,
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Turn header.
    pub info: TurnInfo,
    /// Stats indexed by [`Side::index`].
    pub stats: [PlayerStats; 2],
    /// Stationary units of both sides.
    pub structures: Vec<Structure>,
    /// Events of this (sub-)frame.
    pub events: Events,
}

impl Frame {
    /// Decode one line sent by the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not JSON or any required field is
    /// missing or mistyped.
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| FrameError::Json(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Decode an already-parsed frame object.
    ///
    /// # Errors
    ///
    /// Same as [`Frame::parse`].
    pub fn from_value(value: &Value) -> Result<Self, FrameError> {
        let info = parse_turn_info(value)?;
        if info.phase == Phase::GameOver {
            return Ok(Self {
                info,
                stats: [PlayerStats::default(); 2],
                structures: Vec::new(),
                events: Events::default(),
            });
        }

        let stats = [
            parse_stats(field(value, "p1Stats")?, "p1Stats")?,
            parse_stats(field(value, "p2Stats")?, "p2Stats")?,
        ];

        let mut structures = parse_structures(field(value, "p1Units")?, Side::Own, "p1Units")?;
        structures.extend(parse_structures(
            field(value, "p2Units")?,
            Side::Opponent,
            "p2Units",
        )?);

        let events = match value.get("events") {
            Some(events) => parse_events(events)?,
            None if info.phase == Phase::Decision => Events::default(),
            None => return Err(FrameError::MissingField("events")),
        };

        Ok(Self {
            info,
            stats,
            structures,
            events,
        })
    }

    /// Stats of one side.
    #[must_use]
    pub const fn stats(&self, side: Side) -> PlayerStats {
        self.stats[side.index()]
    }
}

fn field<'a>(value: &'a Value, name: &'static str) -> Result<&'a Value, FrameError> {
    value.get(name).ok_or(FrameError::MissingField(name))
}

fn array<'a>(value: &'a Value, name: &'static str) -> Result<&'a [Value], FrameError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| invalid(name, value))
}

fn element<'a>(
    items: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<&'a Value, FrameError> {
    items.get(index).ok_or(FrameError::MissingField(name))
}

fn invalid(name: &'static str, found: &Value) -> FrameError {
    FrameError::InvalidField {
        field: name,
        found: found.to_string(),
    }
}

fn as_f64(value: &Value, name: &'static str) -> Result<f64, FrameError> {
    value.as_f64().ok_or_else(|| invalid(name, value))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_u64(value: &Value, name: &'static str) -> Result<u64, FrameError> {
    // The host occasionally writes integral values as floats.
    match value.as_u64() {
        Some(n) => Ok(n),
        None => value
            .as_f64()
            .filter(|f| f.fract().abs() < f64::EPSILON && *f >= 0.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u64)
            .ok_or_else(|| invalid(name, value)),
    }
}

fn as_coord(value: &Value, name: &'static str) -> Result<Coord, FrameError> {
    let pair = array(value, name)?;
    if pair.len() < 2 {
        return Err(invalid(name, value));
    }
    let x = u8::try_from(as_u64(&pair[0], name)?).map_err(|_| invalid(name, value))?;
    let y = u8::try_from(as_u64(&pair[1], name)?).map_err(|_| invalid(name, value))?;
    Ok(Coord::new(x, y))
}

fn as_class(value: &Value, name: &'static str) -> Result<u8, FrameError> {
    u8::try_from(as_u64(value, name)?).map_err(|_| invalid(name, value))
}

fn as_owner(value: &Value, name: &'static str) -> Result<Side, FrameError> {
    Side::from_owner_flag(as_u64(value, name)?).ok_or_else(|| invalid(name, value))
}

fn as_id(value: &Value, name: &'static str) -> Result<String, FrameError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(name, other)),
    }
}

fn parse_turn_info(value: &Value) -> Result<TurnInfo, FrameError> {
    let items = array(field(value, "turnInfo")?, "turnInfo")?;
    let phase = match as_u64(element(items, 0, "turnInfo.phase")?, "turnInfo.phase")? {
        0 => Phase::Decision,
        1 => Phase::Action,
        2 => Phase::GameOver,
        _ => return Err(invalid("turnInfo.phase", &items[0])),
    };
    if phase == Phase::GameOver {
        return Ok(TurnInfo {
            phase,
            turn: 0,
            sub_frame: -1,
        });
    }

    let turn_value = element(items, 1, "turnInfo.turn")?;
    let turn = u32::try_from(as_u64(turn_value, "turnInfo.turn")?)
        .map_err(|_| invalid("turnInfo.turn", turn_value))?;
    let sub_frame = match items.get(2) {
        Some(v) => v.as_i64().ok_or_else(|| invalid("turnInfo.frame", v))?,
        None if phase == Phase::Decision => -1,
        None => return Err(FrameError::MissingField("turnInfo.frame")),
    };

    Ok(TurnInfo {
        phase,
        turn,
        sub_frame,
    })
}

fn parse_stats(value: &Value, name: &'static str) -> Result<PlayerStats, FrameError> {
    let items = array(value, name)?;
    Ok(PlayerStats {
        health: as_f64(element(items, 0, name)?, name)?,
        structure: as_f64(element(items, 1, name)?, name)?,
        unit: as_f64(element(items, 2, name)?, name)?,
    })
}

fn parse_structures(
    value: &Value,
    side: Side,
    name: &'static str,
) -> Result<Vec<Structure>, FrameError> {
    let per_class = array(value, name)?;
    let mut structures = Vec::new();
    let mut upgraded = Vec::new();

    for (class_id, units) in per_class.iter().enumerate() {
        let class_id = u8::try_from(class_id).map_err(|_| invalid(name, value))?;
        let unit_type = UnitType::from_class_id(class_id).filter(|u| u.is_structure());
        if unit_type.is_none() && class_id != UPGRADE_CLASS_ID {
            continue;
        }

        for unit in array(units, name)? {
            let fields = array(unit, name)?;
            let at = Coord::new(
                u8::try_from(as_u64(element(fields, 0, name)?, name)?)
                    .map_err(|_| invalid(name, unit))?,
                u8::try_from(as_u64(element(fields, 1, name)?, name)?)
                    .map_err(|_| invalid(name, unit))?,
            );
            match unit_type {
                Some(unit) => structures.push(Structure {
                    unit,
                    side,
                    at,
                    upgraded: false,
                }),
                None => upgraded.push(at),
            }
        }
    }

    for structure in &mut structures {
        if upgraded.contains(&structure.at) {
            structure.upgraded = true;
        }
    }

    Ok(structures)
}

fn parse_events(value: &Value) -> Result<Events, FrameError> {
    let mut events = Events::default();

    for attack in array(field(value, "attack")?, "events.attack")? {
        let items = array(attack, "events.attack")?;
        events.attacks.push(AttackEvent {
            target: as_coord(element(items, 1, "attack.target")?, "attack.target")?,
            class: UnitType::from_class_id(as_class(
                element(items, 3, "attack.class")?,
                "attack.class",
            )?),
            actor_id: as_id(element(items, 4, "attack.actor")?, "attack.actor")?,
            owner: as_owner(element(items, 6, "attack.owner")?, "attack.owner")?,
        });
    }

    for spawn in array(field(value, "spawn")?, "events.spawn")? {
        let items = array(spawn, "events.spawn")?;
        events.spawns.push(SpawnEvent {
            at: as_coord(element(items, 0, "spawn.at")?, "spawn.at")?,
            class: UnitType::from_class_id(as_class(
                element(items, 1, "spawn.class")?,
                "spawn.class",
            )?),
            owner: as_owner(element(items, 3, "spawn.owner")?, "spawn.owner")?,
        });
    }

    for breach in array(field(value, "breach")?, "events.breach")? {
        let items = array(breach, "events.breach")?;
        events.breaches.push(BreachEvent {
            at: as_coord(element(items, 0, "breach.at")?, "breach.at")?,
            owner: as_owner(element(items, 4, "breach.owner")?, "breach.owner")?,
        });
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECISION: &str = r#"{
        "turnInfo": [0, 3, -1, 0],
        "p1Stats": [30.0, 12.0, 7.5, 1200],
        "p2Stats": [28.0, 9.0, 14.0, 900],
        "p1Units": [[[0, 13, 60.0, "1"]], [], [[3, 12, 75.0, "2"], [4, 12, 75.0, "3"]], [], [], [], [], [[3, 12, 0, "2"]]],
        "p2Units": [[], [], [[10, 16, 75.0, "9"]], [], [], [], [], []],
        "events": {"attack": [], "spawn": [], "breach": [], "damage": [], "move": []}
    }"#;

    #[test]
    fn test_parse_decision_frame() {
        let frame = Frame::parse(DECISION).unwrap();
        assert_eq!(frame.info.phase, Phase::Decision);
        assert_eq!(frame.info.turn, 3);
        assert!((frame.stats(Side::Own).structure - 12.0).abs() < f64::EPSILON);
        assert!((frame.stats(Side::Opponent).unit - 14.0).abs() < f64::EPSILON);
        assert_eq!(frame.structures.len(), 4);

        let upgraded: Vec<_> = frame.structures.iter().filter(|s| s.upgraded).collect();
        assert_eq!(upgraded.len(), 1);
        assert_eq!(upgraded[0].at, Coord::new(3, 12));
        assert_eq!(upgraded[0].unit, UnitType::Turret);

        let theirs: Vec<_> = frame
            .structures
            .iter()
            .filter(|s| s.side == Side::Opponent)
            .collect();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].at, Coord::new(10, 16));
    }

    #[test]
    fn test_parse_action_events() {
        let line = r#"{
            "turnInfo": [1, 3, 17],
            "p1Stats": [30, 12, 7, 0], "p2Stats": [28, 9, 14, 0],
            "p1Units": [[], [], [], [], [], [], [], []],
            "p2Units": [[], [], [], [], [], [], [], []],
            "events": {
                "attack": [[[5, 14], [5, 11], 2.0, 3, "41", "7", 2]],
                "spawn": [[[14, 27], 4, 42, 2]],
                "breach": [[[2, 11], 1, 3, "43", 2]]
            }
        }"#;
        let frame = Frame::parse(line).unwrap();
        assert_eq!(frame.info.phase, Phase::Action);
        assert_eq!(frame.info.sub_frame, 17);

        let attack = &frame.events.attacks[0];
        assert_eq!(attack.target, Coord::new(5, 11));
        assert_eq!(attack.class, Some(UnitType::Scout));
        assert_eq!(attack.actor_id, "41");
        assert_eq!(attack.owner, Side::Opponent);

        assert_eq!(frame.events.spawns[0].class, Some(UnitType::Demolisher));
        assert_eq!(frame.events.breaches[0].at, Coord::new(2, 11));
        assert_eq!(frame.events.breaches[0].owner, Side::Opponent);
    }

    #[test]
    fn test_game_over_frame_needs_only_header() {
        let frame = Frame::parse(r#"{"turnInfo": [2]}"#).unwrap();
        assert_eq!(frame.info.phase, Phase::GameOver);
    }

    #[test]
    fn test_missing_section_is_error() {
        let line = r#"{"turnInfo": [1, 0, 0], "p1Stats": [30, 1, 1, 0], "p2Stats": [30, 1, 1, 0],
            "p1Units": [], "p2Units": []}"#;
        assert_eq!(Frame::parse(line), Err(FrameError::MissingField("events")));
    }

    #[test]
    fn test_bad_owner_flag_is_error() {
        let line = r#"{"turnInfo": [1, 0, 0], "p1Stats": [30, 1, 1, 0], "p2Stats": [30, 1, 1, 0],
            "p1Units": [], "p2Units": [],
            "events": {"attack": [], "spawn": [], "breach": [[[2, 11], 1, 3, "43", 9]]}}"#;
        assert!(matches!(
            Frame::parse(line),
            Err(FrameError::InvalidField { field: "breach.owner", .. })
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(Frame::parse("not json"), Err(FrameError::Json(_))));
    }
}
