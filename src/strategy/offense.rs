//! Resource-threshold scout offensive.

use crate::config::Tuning;
use crate::game::{Arena, Resource, Side, UnitCatalog, UnitType};

/// Launch two scout waves once we can afford `offense_ratio` scouts.
///
/// The second wave asks for far more scouts than we can pay for; the arena
/// places as many as the remaining resource allows. Returns whether the
/// offensive was launched.
pub fn launch_offensive<A: Arena + ?Sized>(
    arena: &mut A,
    catalog: &UnitCatalog,
    tuning: &Tuning,
) -> bool {
    let scout_cost = catalog.cost(UnitType::Scout).unit;
    if scout_cost <= 0.0 {
        return false;
    }
    let affordable = arena.resource(Resource::Unit, Side::Own) / scout_cost;
    if affordable < tuning.offense_ratio {
        return false;
    }

    let [first, second] = tuning.spawn_points;
    arena.attempt_spawn(UnitType::Scout, first, tuning.first_wave);
    arena.attempt_spawn(UnitType::Scout, second, tuning.second_wave);
    true
}
