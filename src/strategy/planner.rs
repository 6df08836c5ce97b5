//! Tier-by-tier defensive construction.
//!
//! Tiers are walked in the current [`TierOrder`]. Two gates can end the walk
//! early, and both end it for the whole turn:
//! - from the second tier on, structure-resource below the reserve;
//! - from the third tier on, fewer turrets than the maturity gate.
//!
//! Inside a tier every cell is requested in order. The arena drops whatever
//! it cannot place, so the planner never checks affordability per cell.

use tracing::debug;

use crate::config::Tuning;
use crate::game::{Arena, Resource, Side, UnitCatalog};
use crate::strategy::{DefenseLayout, TierOrder};

/// Why the planner stopped before the last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStop {
    /// Structure-resource fell below the reserve before this build position.
    LowResource {
        /// Build position that was not started.
        position: usize,
    },
    /// Not enough turrets for the outer tiers.
    Immature {
        /// Build position that was not started.
        position: usize,
    },
}

/// What the planner did this turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanReport {
    /// Tiers that were walked.
    pub tiers_built: usize,
    /// Spawn requests issued.
    pub requests: usize,
    /// Early stop, if any.
    pub stopped: Option<PlanStop>,
    /// Structure-resource left if every request had been accepted.
    ///
    /// Bookkeeping only; it never gates a request.
    pub projected_budget: f64,
}

/// Walk the tiers and request every placement they allow.
pub fn build_defenses<A: Arena + ?Sized>(
    arena: &mut A,
    layout: &DefenseLayout,
    order: &TierOrder,
    turrets: usize,
    catalog: &UnitCatalog,
    tuning: &Tuning,
) -> PlanReport {
    let mut report = PlanReport {
        tiers_built: 0,
        requests: 0,
        stopped: None,
        projected_budget: arena.resource(Resource::Structure, Side::Own),
    };

    for (position, &tier_index) in order.as_slice().iter().enumerate() {
        let structure = arena.resource(Resource::Structure, Side::Own);
        if position >= 1 && structure < tuning.structure_reserve {
            report.stopped = Some(PlanStop::LowResource { position });
            break;
        }
        if position >= 2 && turrets < tuning.maturity_gate {
            report.stopped = Some(PlanStop::Immature { position });
            break;
        }
        let Some(tier) = layout.tier(tier_index) else {
            continue;
        };

        for (unit, at) in tier.placements() {
            arena.attempt_spawn(unit, at, 1);
            report.requests += 1;
            report.projected_budget -= catalog.cost(unit).structure;
        }
        report.tiers_built += 1;
        debug!(position, tier_index, budget = report.projected_budget, "tier requested");
    }

    report
}
