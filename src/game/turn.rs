//! Concrete [`Arena`] for one decision phase.
//!
//! Mirrors the host-side bookkeeping: every request is checked against the
//! board and the live resource ledger, accepted requests are charged
//! immediately, and rejected ones are dropped without telling the caller.

use std::collections::HashSet;

use tracing::debug;

use crate::game::{
    Arena, Coord, Cost, Frame, PlayerStats, Resource, Side, Structure, UnitCatalog, UnitType,
};

/// What an accepted request asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    /// Place a unit.
    Spawn(UnitType),
    /// Upgrade the structure at the order's location.
    Upgrade,
}

/// An accepted request, in the order it was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// What to do.
    pub kind: OrderKind,
    /// Where.
    pub at: Coord,
}

/// The two lines sent back to the host to end a decision phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Structure placements and upgrades.
    pub build: String,
    /// Mobile unit deployments.
    pub deploy: String,
}

/// One decision phase: a board snapshot plus the requests made against it.
#[derive(Debug)]
pub struct Turn<'a> {
    catalog: &'a UnitCatalog,
    number: u32,
    /// `[side][resource]`, structure-resource first.
    ledger: [[f64; 2]; 2],
    structures: Vec<Structure>,
    occupied: HashSet<Coord>,
    pending_upgrades: HashSet<Coord>,
    orders: Vec<Order>,
    rejected: usize,
}

const RESOURCES: [Resource; 2] = [Resource::Structure, Resource::Unit];

const fn resource_index(resource: Resource) -> usize {
    match resource {
        Resource::Structure => 0,
        Resource::Unit => 1,
    }
}

impl<'a> Turn<'a> {
    /// Create a turn from stats and structures.
    #[must_use]
    pub fn new(
        catalog: &'a UnitCatalog,
        number: u32,
        stats: [PlayerStats; 2],
        structures: Vec<Structure>,
    ) -> Self {
        let ledger = stats.map(|s| [s.structure.max(0.0), s.unit.max(0.0)]);
        let occupied = structures.iter().map(|s| s.at).collect();
        Self {
            catalog,
            number,
            ledger,
            structures,
            occupied,
            pending_upgrades: HashSet::new(),
            orders: Vec::new(),
            rejected: 0,
        }
    }

    /// Create a turn from a decision-phase frame.
    #[must_use]
    pub fn from_frame(catalog: &'a UnitCatalog, frame: &Frame) -> Self {
        Self::new(catalog, frame.info.turn, frame.stats, frame.structures.clone())
    }

    /// Turn number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Accepted requests, in request order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of requests dropped this turn.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.rejected
    }

    /// Render the accepted requests as the two host submission lines.
    ///
    /// # Errors
    ///
    /// Returns an error only if JSON serialization fails.
    pub fn submission(&self) -> Result<Submission, serde_json::Error> {
        let mut build = Vec::new();
        let mut deploy = Vec::new();
        for order in &self.orders {
            match order.kind {
                OrderKind::Spawn(unit) if unit.is_structure() => {
                    build.push((self.catalog.shorthand(unit), order.at.x, order.at.y));
                }
                OrderKind::Spawn(unit) => {
                    deploy.push((self.catalog.shorthand(unit), order.at.x, order.at.y));
                }
                OrderKind::Upgrade => {
                    build.push((self.catalog.upgrade_shorthand(), order.at.x, order.at.y));
                }
            }
        }
        Ok(Submission {
            build: serde_json::to_string(&build)?,
            deploy: serde_json::to_string(&deploy)?,
        })
    }

    fn can_afford(&self, cost: Cost) -> bool {
        RESOURCES
            .iter()
            .all(|&r| cost.of(r) <= self.resource(r, Side::Own))
    }

    fn charge(&mut self, cost: Cost) {
        let own = &mut self.ledger[Side::Own.index()];
        for r in RESOURCES {
            let held = &mut own[resource_index(r)];
            *held = (*held - cost.of(r)).max(0.0);
        }
    }

    fn placement_allowed(&self, unit: UnitType, at: Coord) -> bool {
        if !at.in_arena() || self.occupied.contains(&at) {
            return false;
        }
        if unit.is_structure() {
            at.is_own_half()
        } else {
            at.is_own_edge()
        }
    }
}

impl Arena for Turn<'_> {
    fn resource(&self, resource: Resource, side: Side) -> f64 {
        self.ledger[side.index()][resource_index(resource)]
    }

    fn structures(&self) -> &[Structure] {
        &self.structures
    }

    fn attempt_spawn(&mut self, unit: UnitType, at: Coord, count: u32) {
        let cost = self.catalog.cost(unit);
        for placed in 0..count {
            if !self.placement_allowed(unit, at) || !self.can_afford(cost) {
                debug!(?unit, %at, placed, requested = count, "spawn dropped");
                self.rejected += 1;
                return;
            }
            self.charge(cost);
            if unit.is_structure() {
                self.occupied.insert(at);
                self.structures.push(Structure {
                    unit,
                    side: Side::Own,
                    at,
                    upgraded: false,
                });
            }
            self.orders.push(Order {
                kind: OrderKind::Spawn(unit),
                at,
            });
        }
    }

    fn attempt_upgrade(&mut self, at: Coord) {
        let target = self
            .structures
            .iter()
            .find(|s| s.side == Side::Own && s.at == at && !s.upgraded)
            .map(|s| s.unit);
        let Some(unit) = target else {
            debug!(%at, "upgrade dropped: no upgradable structure");
            self.rejected += 1;
            return;
        };
        let cost = self.catalog.upgrade_cost(unit);
        if self.pending_upgrades.contains(&at) || !self.can_afford(cost) {
            debug!(%at, "upgrade dropped");
            self.rejected += 1;
            return;
        }
        self.charge(cost);
        self.pending_upgrades.insert(at);
        self.orders.push(Order {
            kind: OrderKind::Upgrade,
            at,
        });
    }
}
