//! Strategy tuning.
//!
//! Every heuristic constant the strategy uses lives here. The defaults are
//! the values the agent plays with; a JSON file can override any subset.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::Coord;

/// Heuristic constants for one game.
///
/// Resolved once before the game starts and owned by the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Structure-resource that must be on hand before any tier past the
    /// first is started.
    pub structure_reserve: f64,
    /// Turrets we must own before the outer tiers are built.
    pub maturity_gate: usize,
    /// How many of the most recent breaches drive reprioritization.
    pub breach_sample: usize,
    /// Estimated opponent spend in one turn that counts as an attack.
    pub attack_spend_threshold: f64,
    /// Sub-frames per timing histogram bucket.
    pub frames_per_bucket: u32,
    /// Opponent unit-resource per counter-unit we deploy.
    pub counter_unit_divisor: f64,
    /// Most counter-units requested in one turn, whatever the opponent holds.
    pub max_counter_units: usize,
    /// Scouts we must be able to afford before launching an offensive.
    pub offense_ratio: f64,
    /// Scouts sent from the first spawn point.
    pub first_wave: u32,
    /// Scouts requested from the second spawn point; the arena caps this at
    /// whatever we can afford.
    pub second_wave: u32,
    /// Edge cells the two offensive waves enter from.
    pub spawn_points: [Coord; 2],
    /// Structures upgraded every turn.
    pub upgrade_targets: Vec<Coord>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            structure_reserve: 6.0,
            maturity_gate: 15,
            breach_sample: 3,
            attack_spend_threshold: 6.0,
            frames_per_bucket: 8,
            counter_unit_divisor: 5.0,
            max_counter_units: 100,
            offense_ratio: 18.0,
            first_wave: 8,
            second_wave: 1000,
            spawn_points: [Coord::new(15, 1), Coord::new(16, 2)],
            upgrade_targets: vec![Coord::new(1, 13), Coord::new(2, 12), Coord::new(27, 13)],
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// tuning document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
