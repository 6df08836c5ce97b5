//! The decision core.
//!
//! One [`Strategy`] value lives for a whole game. Every decision phase runs
//! the same fixed sequence against an [`Arena`]:
//!
//! ```text
//! census → reprioritize → build tiers → upgrade → predict → counter-units → offensive
//! ```
//!
//! Between decision phases, action sub-frames are fed to
//! [`Strategy::on_action_frame`], which only updates telemetry.

mod allocator;
mod census;
mod offense;
mod planner;
mod predictor;
mod reprioritizer;
mod telemetry;
mod tiers;
mod upgrader;

pub use allocator::{allocate, bucket_cell, counter_unit_count, deploy_counter_units};
pub use census::{census, count_own_turrets};
pub use offense::launch_offensive;
pub use planner::{PlanReport, PlanStop, build_defenses};
pub use predictor::{attack_predicted, attack_vote, level_key};
pub use reprioritizer::{reprioritize, right_flank_pressure};
pub use telemetry::{Breach, HISTOGRAM_BUCKETS, Telemetry};
pub use tiers::{DefenseLayout, PriorityTier, Role, RoleGroup, TierOrder};
pub use upgrader::upgrade_defenses;

use tracing::info;

use crate::config::Tuning;
use crate::game::{Arena, Frame, Resource, Side, UnitCatalog};

/// Summary of one decision pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnReport {
    /// Turn number.
    pub turn: u32,
    /// Turrets we owned at the start of the pass.
    pub turrets: usize,
    /// Whether breaches pushed the right-flank tiers forward this turn.
    pub rotated: bool,
    /// What the tier planner did.
    pub plan: PlanReport,
    /// Whether an opponent attack was predicted.
    pub attack_predicted: bool,
    /// Counter-units requested.
    pub counter_units: usize,
    /// Whether the scout offensive was launched.
    pub offensive: bool,
}

/// Game-long strategy state.
#[derive(Debug, Clone)]
pub struct Strategy {
    tuning: Tuning,
    catalog: UnitCatalog,
    layout: DefenseLayout,
    order: TierOrder,
    telemetry: Telemetry,
}

impl Strategy {
    /// Create a strategy with the default defense layout.
    #[must_use]
    pub fn new(tuning: Tuning, catalog: UnitCatalog) -> Self {
        Self::with_layout(tuning, catalog, DefenseLayout::default())
    }

    /// Create a strategy with a custom defense layout.
    #[must_use]
    pub fn with_layout(tuning: Tuning, catalog: UnitCatalog, layout: DefenseLayout) -> Self {
        let telemetry = Telemetry::new(tuning.frames_per_bucket, tuning.attack_spend_threshold);
        Self {
            order: TierOrder::identity(layout.len()),
            tuning,
            catalog,
            layout,
            telemetry,
        }
    }

    /// Run one decision pass for `turn` against `arena`.
    pub fn on_turn<A: Arena + ?Sized>(&mut self, arena: &mut A, turn: u32) -> TurnReport {
        self.telemetry.begin_turn(turn);

        let turrets = census(arena);

        let breaches = self.telemetry.breach_locations();
        let next = reprioritize(&self.order, &breaches, self.tuning.breach_sample);
        let rotated = next != self.order;
        self.order = next;

        let plan = build_defenses(
            arena,
            &self.layout,
            &self.order,
            turrets,
            &self.catalog,
            &self.tuning,
        );

        upgrade_defenses(arena, &self.tuning.upgrade_targets);

        let opponent_units = arena.resource(Resource::Unit, Side::Opponent);
        self.telemetry.record_opponent_level(level_key(opponent_units));
        let predicted = attack_predicted(self.telemetry.outcomes(), opponent_units);

        let counter_units = if predicted {
            deploy_counter_units(
                arena,
                self.telemetry.histogram(),
                opponent_units,
                self.tuning.counter_unit_divisor,
                self.tuning.max_counter_units,
            )
        } else {
            0
        };

        let offensive = launch_offensive(arena, &self.catalog, &self.tuning);

        let report = TurnReport {
            turn,
            turrets,
            rotated,
            plan,
            attack_predicted: predicted,
            counter_units,
            offensive,
        };
        info!(
            turn,
            turrets,
            rotated,
            tiers = plan.tiers_built,
            predicted,
            counter_units,
            offensive,
            "turn planned"
        );
        report
    }

    /// Fold one action sub-frame of the turn just played into telemetry.
    pub fn on_action_frame(&mut self, frame: &Frame) {
        self.telemetry.ingest(frame);
    }

    /// Current tier build order.
    #[must_use]
    pub const fn tier_order(&self) -> &TierOrder {
        &self.order
    }

    /// Telemetry gathered so far.
    #[must_use]
    pub const fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        AttackEvent, BreachEvent, Coord, Events, OrderKind, Phase, PlayerStats, Structure, Turn,
        TurnInfo, UnitType,
    };

    fn stats(own_structure: f64, own_unit: f64, their_unit: f64) -> [PlayerStats; 2] {
        [
            PlayerStats {
                health: 30.0,
                structure: own_structure,
                unit: own_unit,
            },
            PlayerStats {
                health: 30.0,
                structure: 0.0,
                unit: their_unit,
            },
        ]
    }

    fn action(turn: u32, sub_frame: i64, events: Events) -> Frame {
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

    #[test]
    fn test_first_turn_builds_core_tier_only() {
        let catalog = UnitCatalog::default();
        let mut strategy = Strategy::new(Tuning::default(), catalog.clone());
        let mut turn = Turn::new(&catalog, 0, stats(35.0, 5.0, 5.0), Vec::new());

        let report = strategy.on_turn(&mut turn, 0);
        assert_eq!(report.turrets, 0);
        assert!(!report.rotated);
        assert!(!report.attack_predicted);
        assert!(!report.offensive);
        assert_eq!(report.plan.stopped, Some(PlanStop::LowResource { position: 1 }));

        // 21 walls (21) + 4 turrets (8) + 1 support (4) = 33 leaves 2, below
        // the reserve. Of the upgrade targets only the corner wall exists.
        let spawned = turn
            .orders()
            .iter()
            .filter(|o| matches!(o.kind, OrderKind::Spawn(_)))
            .count();
        assert_eq!(spawned, 26);
        let upgrades: Vec<Coord> = turn
            .orders()
            .iter()
            .filter(|o| o.kind == OrderKind::Upgrade)
            .map(|o| o.at)
            .collect();
        assert_eq!(upgrades, vec![Coord::new(27, 13)]);
    }

    #[test]
    fn test_breaches_rotate_tiers_next_turn() {
        let catalog = UnitCatalog::default();
        let mut strategy = Strategy::new(Tuning::default(), catalog.clone());
        let mut turn = Turn::new(&catalog, 0, stats(0.0, 0.0, 0.0), Vec::new());
        strategy.on_turn(&mut turn, 0);

        let breaches = Events {
            breaches: vec![
                BreachEvent {
                    at: Coord::new(24, 10),
                    owner: Side::Opponent,
                },
                BreachEvent {
                    at: Coord::new(25, 11),
                    owner: Side::Opponent,
                },
            ],
            ..Events::default()
        };
        strategy.on_action_frame(&action(0, 30, breaches));

        let mut turn = Turn::new(&catalog, 1, stats(0.0, 0.0, 0.0), Vec::new());
        let report = strategy.on_turn(&mut turn, 1);
        assert!(report.rotated);
        assert_eq!(strategy.tier_order().as_slice(), &[0, 3, 1, 2, 4]);
    }

    #[test]
    fn test_predicted_attack_deploys_interceptors() {
        let catalog = UnitCatalog::default();
        let mut strategy = Strategy::new(Tuning::default(), catalog.clone());

        // Turn 0: opponent sits on 10 unit-resource and spends 6 of it.
        let mut turn = Turn::new(&catalog, 0, stats(0.0, 0.0, 10.0), Vec::new());
        strategy.on_turn(&mut turn, 0);
        let attack = Events {
            attacks: vec![AttackEvent {
                target: Coord::new(3, 10),
                class: Some(UnitType::Demolisher),
                actor_id: "77".to_string(),
                owner: Side::Opponent,
            }],
            spawns: vec![
                crate::game::SpawnEvent {
                    at: Coord::new(13, 27),
                    class: Some(UnitType::Demolisher),
                    owner: Side::Opponent,
                };
                2
            ],
            ..Events::default()
        };
        strategy.on_action_frame(&action(0, 20, attack));

        // Turn 1: they hold 15, above the level they attacked at.
        let mut turn = Turn::new(&catalog, 1, stats(0.0, 5.0, 15.0), Vec::new());
        let report = strategy.on_turn(&mut turn, 1);
        assert!(report.attack_predicted);
        assert_eq!(report.counter_units, 3);
        assert_eq!(strategy.telemetry().outcomes().get(&10), Some(&true));

        // All three target bucket 2's cell; only what we can afford is placed.
        let interceptors: Vec<Coord> = turn
            .orders()
            .iter()
            .filter(|o| o.kind == OrderKind::Spawn(UnitType::Interceptor))
            .map(|o| o.at)
            .collect();
        assert_eq!(interceptors, vec![Coord::new(3, 10); 3]);
    }

    #[test]
    fn test_interceptors_spent_before_offensive_check() {
        let catalog = UnitCatalog::default();
        let mut strategy = Strategy::new(Tuning::default(), catalog.clone());

        let mut turn = Turn::new(&catalog, 0, stats(0.0, 0.0, 10.0), Vec::new());
        strategy.on_turn(&mut turn, 0);
        let spawns = Events {
            spawns: vec![
                crate::game::SpawnEvent {
                    at: Coord::new(13, 27),
                    class: Some(UnitType::Demolisher),
                    owner: Side::Opponent,
                };
                2
            ],
            ..Events::default()
        };
        strategy.on_action_frame(&action(0, 5, spawns));

        // 20 would clear the scout threshold of 18, but three interceptors
        // leave 17.
        let mut turn = Turn::new(&catalog, 1, stats(0.0, 20.0, 15.0), Vec::new());
        let report = strategy.on_turn(&mut turn, 1);
        assert!(report.attack_predicted);
        assert_eq!(report.counter_units, 3);
        assert!(!report.offensive);
        assert!(
            !turn
                .orders()
                .iter()
                .any(|o| o.kind == OrderKind::Spawn(UnitType::Scout))
        );
        assert!((turn.resource(Resource::Unit, Side::Own) - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mature_defense_reaches_outer_tiers() {
        let catalog = UnitCatalog::default();
        let mut strategy = Strategy::new(Tuning::default(), catalog.clone());
        let turrets: Vec<Structure> = (0..15)
            .map(|i| Structure {
                unit: UnitType::Turret,
                side: Side::Own,
                at: Coord::new(6 + i, 13),
                upgraded: false,
            })
            .collect();
        let mut turn = Turn::new(&catalog, 9, stats(500.0, 0.0, 0.0), turrets);

        let report = strategy.on_turn(&mut turn, 9);
        assert_eq!(report.turrets, 15);
        assert_eq!(report.plan.tiers_built, 5);
        assert_eq!(report.plan.stopped, None);
    }
}
