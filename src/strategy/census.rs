//! Count of our own turrets, which gates the outer defense tiers.

use crate::game::{Arena, Side, Structure, UnitType};

/// Count the turrets we own among `structures`.
#[must_use]
pub fn count_own_turrets(structures: &[Structure]) -> usize {
    structures
        .iter()
        .filter(|s| s.side == Side::Own && s.unit == UnitType::Turret)
        .count()
}

/// Count the turrets we own on the arena's board.
#[must_use]
pub fn census<A: Arena + ?Sized>(arena: &A) -> usize {
    count_own_turrets(arena.structures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Coord;

    fn turrets(count: u8, side: Side) -> Vec<Structure> {
        (0..count)
            .map(|i| Structure {
                unit: UnitType::Turret,
                side,
                at: Coord::new(i, 13),
                upgraded: false,
            })
            .collect()
    }

    #[test]
    fn test_census_counts_exactly() {
        for count in [0, 1, 14, 15, 16] {
            assert_eq!(count_own_turrets(&turrets(count, Side::Own)), usize::from(count));
        }
    }

    #[test]
    fn test_census_ignores_other_units_and_sides() {
        let mut structures = turrets(3, Side::Own);
        structures.extend(turrets(5, Side::Opponent));
        structures.push(Structure {
            unit: UnitType::Wall,
            side: Side::Own,
            at: Coord::new(20, 13),
            upgraded: false,
        });
        structures.push(Structure {
            unit: UnitType::Support,
            side: Side::Own,
            at: Coord::new(21, 13),
            upgraded: true,
        });
        assert_eq!(count_own_turrets(&structures), 3);
    }
}
