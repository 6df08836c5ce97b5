//! Cross-turn telemetry gathered from action sub-frames.
//!
//! Sub-frames for a turn arrive after that turn's decision pass and before
//! the next one. The tracker keeps three game-long records:
//! - a timing histogram of first contact by enemy attackers on our left flank,
//! - the breach log,
//! - the outcome map from opponent unit-resource level to "they attacked".
//!
//! Two per-turn accumulators (actors already counted, estimated opponent
//! spend) are cleared by [`Telemetry::begin_turn`], which also closes the
//! previous turn's outcome.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::game::{Coord, Frame, Side, UnitType};

/// Number of timing buckets per turn.
pub const HISTOGRAM_BUCKETS: usize = 14;

/// Estimated unit-resource an opponent spent on one unit of `unit`.
const fn estimated_spend(unit: UnitType) -> f64 {
    match unit {
        UnitType::Scout => 1.0,
        UnitType::Demolisher => 3.0,
        _ => 0.0,
    }
}

/// One breach against us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breach {
    /// Turn the breach happened on.
    pub turn: u32,
    /// Edge cell the enemy unit reached.
    pub at: Coord,
}

/// Telemetry state owned by the strategy for the whole game.
#[derive(Debug, Clone)]
pub struct Telemetry {
    frames_per_bucket: u32,
    attack_spend_threshold: f64,
    histogram: [u32; HISTOGRAM_BUCKETS],
    breaches: Vec<Breach>,
    outcomes: BTreeMap<i64, bool>,
    // Per-turn state.
    turn: u32,
    counted: HashSet<String>,
    spend: f64,
    frames_seen: usize,
    opponent_level: Option<i64>,
}

impl Telemetry {
    /// Create an empty tracker.
    #[must_use]
    pub fn new(frames_per_bucket: u32, attack_spend_threshold: f64) -> Self {
        Self {
            frames_per_bucket,
            attack_spend_threshold,
            histogram: [0; HISTOGRAM_BUCKETS],
            breaches: Vec::new(),
            outcomes: BTreeMap::new(),
            turn: 0,
            counted: HashSet::new(),
            spend: 0.0,
            frames_seen: 0,
            opponent_level: None,
        }
    }

    /// Start turn `turn`: close the previous turn and clear per-turn state.
    ///
    /// If any sub-frame of the previous turn was seen, the opponent
    /// unit-resource level recorded for it is mapped to whether their
    /// estimated spend reached the attack threshold.
    pub fn begin_turn(&mut self, turn: u32) {
        if self.frames_seen > 0 {
            if let Some(level) = self.opponent_level {
                let attacked = self.spend >= self.attack_spend_threshold;
                debug!(turn = self.turn, level, spend = self.spend, attacked, "turn outcome");
                self.outcomes.insert(level, attacked);
            }
        }
        self.turn = turn;
        self.counted.clear();
        self.spend = 0.0;
        self.frames_seen = 0;
        self.opponent_level = None;
    }

    /// Record the opponent unit-resource level seen in this turn's decision pass.
    pub fn record_opponent_level(&mut self, level: i64) {
        self.opponent_level = Some(level);
    }

    /// Fold one action sub-frame into the records.
    pub fn ingest(&mut self, frame: &Frame) {
        self.frames_seen += 1;
        let bucket = self.bucket_for(frame.info.sub_frame);

        for attack in &frame.events.attacks {
            let offensive = attack.class.is_some_and(UnitType::is_offensive_mobile);
            if attack.owner != Side::Opponent
                || !offensive
                || self.counted.contains(&attack.actor_id)
            {
                continue;
            }
            if let Some(bucket) = bucket.filter(|_| attack.target.in_defended_quadrant()) {
                self.histogram[bucket] += 1;
                self.counted.insert(attack.actor_id.clone());
            }
        }

        for spawn in &frame.events.spawns {
            if spawn.owner == Side::Opponent {
                self.spend += spawn.class.map_or(0.0, estimated_spend);
            }
        }

        for breach in &frame.events.breaches {
            if breach.owner == Side::Opponent {
                warn!(turn = self.turn, at = %breach.at, "breached");
                self.breaches.push(Breach {
                    turn: self.turn,
                    at: breach.at,
                });
            }
        }
    }

    fn bucket_for(&self, sub_frame: i64) -> Option<usize> {
        let sub_frame = u64::try_from(sub_frame).ok()?;
        let bucket = sub_frame.checked_div(u64::from(self.frames_per_bucket))?;
        usize::try_from(bucket)
            .ok()
            .filter(|&b| b < HISTOGRAM_BUCKETS)
    }

    /// Contact counts per timing bucket.
    #[must_use]
    pub const fn histogram(&self) -> &[u32; HISTOGRAM_BUCKETS] {
        &self.histogram
    }

    /// Every breach against us, oldest first.
    #[must_use]
    pub fn breaches(&self) -> &[Breach] {
        &self.breaches
    }

    /// Breach locations, oldest first.
    #[must_use]
    pub fn breach_locations(&self) -> Vec<Coord> {
        self.breaches.iter().map(|b| b.at).collect()
    }

    /// Opponent unit-resource level → whether they attacked at that level.
    #[must_use]
    pub const fn outcomes(&self) -> &BTreeMap<i64, bool> {
        &self.outcomes
    }

    /// Estimated opponent spend so far this turn.
    #[must_use]
    pub const fn spend(&self) -> f64 {
        self.spend
    }

    /// Attackers already counted toward the histogram this turn.
    #[must_use]
    pub fn counted_this_turn(&self) -> usize {
        self.counted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        AttackEvent, BreachEvent, Events, Phase, PlayerStats, SpawnEvent, TurnInfo,
    };

    fn frame(turn: u32, sub_frame: i64, events: Events) -> Frame {
        Frame {
            info: TurnInfo {
                phase: Phase::Action,
                turn,
                sub_frame,
            },
            stats: [PlayerStats::default(); 2],
            structures: Vec::new(),
            events,
        }
    }

    fn attack(id: &str, target: (u8, u8), class: UnitType, owner: Side) -> AttackEvent {
        AttackEvent {
            target: Coord::new(target.0, target.1),
            class: Some(class),
            actor_id: id.to_string(),
            owner,
        }
    }

    fn spawn(class: UnitType, owner: Side) -> SpawnEvent {
        SpawnEvent {
            at: Coord::new(13, 27),
            class: Some(class),
            owner,
        }
    }

    #[test]
    fn test_first_contact_counted_once_per_actor() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(1);

        let events = Events {
            attacks: vec![
                attack("a", (5, 11), UnitType::Scout, Side::Opponent),
                attack("a", (5, 10), UnitType::Scout, Side::Opponent),
                attack("b", (6, 11), UnitType::Demolisher, Side::Opponent),
            ],
            ..Events::default()
        };
        telemetry.ingest(&frame(1, 17, events));
        telemetry.ingest(&frame(
            1,
            40,
            Events {
                attacks: vec![attack("a", (4, 11), UnitType::Scout, Side::Opponent)],
                ..Events::default()
            },
        ));

        assert_eq!(telemetry.histogram()[2], 2);
        assert_eq!(telemetry.histogram().iter().sum::<u32>(), 2);
    }

    #[test]
    fn test_contact_filters() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(1);
        let events = Events {
            attacks: vec![
                // Our own unit.
                attack("a", (5, 11), UnitType::Scout, Side::Own),
                // Interceptors are not offensive.
                attack("b", (5, 11), UnitType::Interceptor, Side::Opponent),
                // Right flank.
                attack("c", (20, 11), UnitType::Scout, Side::Opponent),
                // Enemy half.
                attack("d", (5, 15), UnitType::Scout, Side::Opponent),
            ],
            ..Events::default()
        };
        telemetry.ingest(&frame(1, 0, events));
        assert_eq!(telemetry.histogram(), &[0; HISTOGRAM_BUCKETS]);
        assert_eq!(telemetry.counted_this_turn(), 0);
    }

    #[test]
    fn test_late_frames_fall_outside_histogram() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(1);
        let late = Events {
            attacks: vec![attack("z", (5, 11), UnitType::Scout, Side::Opponent)],
            ..Events::default()
        };
        telemetry.ingest(&frame(1, 112, late.clone()));
        assert_eq!(telemetry.histogram().iter().sum::<u32>(), 0);
        // Not counted, so a later in-range contact by the same actor still is.
        telemetry.ingest(&frame(1, 111, late));
        assert_eq!(telemetry.histogram()[13], 1);
    }

    #[test]
    fn test_outcome_written_when_turn_closes() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(1);
        telemetry.record_opponent_level(12);
        let spawns = Events {
            spawns: vec![
                spawn(UnitType::Demolisher, Side::Opponent),
                spawn(UnitType::Scout, Side::Opponent),
                spawn(UnitType::Scout, Side::Own),
                spawn(UnitType::Turret, Side::Opponent),
            ],
            ..Events::default()
        };
        telemetry.ingest(&frame(1, 0, spawns.clone()));
        telemetry.ingest(&frame(1, 1, spawns));
        assert!((telemetry.spend() - 8.0).abs() < f64::EPSILON);
        assert!(telemetry.outcomes().is_empty());

        telemetry.begin_turn(2);
        assert_eq!(telemetry.outcomes().get(&12), Some(&true));
        assert!(telemetry.spend().abs() < f64::EPSILON);

        // A quiet turn at the same level overwrites the earlier outcome.
        telemetry.record_opponent_level(12);
        telemetry.ingest(&frame(2, 0, Events::default()));
        telemetry.begin_turn(3);
        assert_eq!(telemetry.outcomes().get(&12), Some(&false));
    }

    #[test]
    fn test_no_outcome_without_frames() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(0);
        telemetry.record_opponent_level(5);
        telemetry.begin_turn(1);
        assert!(telemetry.outcomes().is_empty());
    }

    #[test]
    fn test_per_turn_state_does_not_carry_over() {
        let mut telemetry = Telemetry::new(8, 6.0);
        telemetry.begin_turn(1);
        let events = Events {
            attacks: vec![attack("a", (5, 11), UnitType::Scout, Side::Opponent)],
            spawns: vec![spawn(UnitType::Scout, Side::Opponent)],
            ..Events::default()
        };
        telemetry.ingest(&frame(1, 0, events.clone()));
        assert_eq!(telemetry.counted_this_turn(), 1);

        telemetry.begin_turn(2);
        assert_eq!(telemetry.counted_this_turn(), 0);
        assert!(telemetry.spend().abs() < f64::EPSILON);

        // The same actor id is counted again on the new turn.
        telemetry.ingest(&frame(2, 0, events));
        assert_eq!(telemetry.histogram()[0], 2);
        assert!((telemetry.spend() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_breach_log_keeps_order() {
        let mut telemetry = Telemetry::new(8, 6.0);
        for turn in 1..=3u8 {
            telemetry.begin_turn(u32::from(turn));
            let events = Events {
                breaches: vec![
                    BreachEvent {
                        at: Coord::new(turn, 13 - turn),
                        owner: Side::Opponent,
                    },
                    BreachEvent {
                        at: Coord::new(27, 13),
                        owner: Side::Own,
                    },
                ],
                ..Events::default()
            };
            telemetry.ingest(&frame(u32::from(turn), 5, events));
        }
        let turns: Vec<u32> = telemetry.breaches().iter().map(|b| b.turn).collect();
        assert_eq!(turns, vec![1, 2, 3]);
        assert_eq!(
            telemetry.breach_locations(),
            vec![Coord::new(1, 12), Coord::new(2, 11), Coord::new(3, 10)]
        );
    }
}
