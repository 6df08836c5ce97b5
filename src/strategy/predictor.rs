//! Vote on whether the opponent attacks this turn.
//!
//! Each past level is a witness. A level below today's at which they
//! attacked votes yes; a level above today's at which they held back votes
//! no. Everything else abstains.

use std::collections::BTreeMap;

/// Outcome-map key for a resource reading.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn level_key(resource: f64) -> i64 {
    resource.floor() as i64
}

/// Net vote of the outcome map at the raw resource reading `level`.
///
/// Keys are floored levels, but the reading is compared unfloored: 10.9 is
/// above key 10.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn attack_vote(outcomes: &BTreeMap<i64, bool>, level: f64) -> i64 {
    outcomes
        .iter()
        .map(|(&key, &attacked)| {
            let key = key as f64;
            match (level > key, level < key, attacked) {
                (true, _, true) => 1,
                (_, true, false) => -1,
                _ => 0,
            }
        })
        .sum()
}

/// Whether an attack is expected at the raw resource reading `level`.
#[must_use]
pub fn attack_predicted(outcomes: &BTreeMap<i64, bool>, level: f64) -> bool {
    attack_vote(outcomes, level) > 0
}
