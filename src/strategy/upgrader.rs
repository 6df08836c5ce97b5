//! Fixed upgrade targets, requested every turn.

use crate::game::{Arena, Coord};

/// Request an upgrade at every target; the arena ignores cells with nothing
/// upgradable on them.
pub fn upgrade_defenses<A: Arena + ?Sized>(arena: &mut A, targets: &[Coord]) {
    for &at in targets {
        arena.attempt_upgrade(at);
    }
}
