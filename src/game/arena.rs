//! The surface the strategy uses to read the board and issue requests.

use crate::game::{Coord, Resource, UnitType};

/// One of the two players, from our point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Us.
    Own,
    /// The opponent.
    Opponent,
}

impl Side {
    /// Index into per-side arrays (`Own` = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Own => 0,
            Side::Opponent => 1,
        }
    }

    /// Decode the owner flag used in frame events (1 = us, 2 = opponent).
    #[must_use]
    pub const fn from_owner_flag(flag: u64) -> Option<Self> {
        match flag {
            1 => Some(Side::Own),
            2 => Some(Side::Opponent),
            _ => None,
        }
    }
}

/// A stationary unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Structure {
    /// Wall, support, or turret.
    pub unit: UnitType,
    /// Who owns it.
    pub side: Side,
    /// Where it stands.
    pub at: Coord,
    /// Whether it has been upgraded.
    pub upgraded: bool,
}

/// Read access to the current turn and a sink for build requests.
///
/// Requests are fire-and-forget: the arena decides whether each one is
/// legal and affordable and silently drops those that are not. Resource
/// reads always reflect requests accepted so far this turn.
pub trait Arena {
    /// Current amount of `resource` held by `side`.
    fn resource(&self, resource: Resource, side: Side) -> f64;

    /// All stationary units on the board, both sides.
    fn structures(&self) -> &[Structure];

    /// Request `count` units of `unit` at `at`.
    fn attempt_spawn(&mut self, unit: UnitType, at: Coord, count: u32);

    /// Request an upgrade of our structure at `at`.
    fn attempt_upgrade(&mut self, at: Coord);
}
