//! Defense priority tiers and the order they are built in.
//!
//! The layout itself never changes during a game. What changes is the
//! [`TierOrder`], a permutation of tier indices that the reprioritizer
//! rewrites by swapping pairs.

use crate::game::{Coord, UnitType};

/// What a group of cells in a tier is built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    /// Blocking walls (role index 0).
    Wall,
    /// Turrets (role index 1).
    Turret,
    /// Support structures (role index 2 and above).
    Support,
}

impl Role {
    /// Structure placed for this role.
    #[must_use]
    pub const fn unit(self) -> UnitType {
        match self {
            Role::Wall => UnitType::Wall,
            Role::Turret => UnitType::Turret,
            Role::Support => UnitType::Support,
        }
    }
}

/// Cells built with one role, in placement order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGroup {
    /// What to build.
    pub role: Role,
    /// Where, in order.
    pub cells: Vec<Coord>,
}

/// One tier of the defense plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTier {
    groups: Vec<RoleGroup>,
}

impl PriorityTier {
    /// Build a tier; groups are kept sorted by role so walls go down first.
    #[must_use]
    pub fn new(mut groups: Vec<RoleGroup>) -> Self {
        groups.sort_by_key(|g| g.role);
        Self { groups }
    }

    /// Role groups in build order.
    #[must_use]
    pub fn groups(&self) -> &[RoleGroup] {
        &self.groups
    }

    /// Every placement in this tier, in build order.
    pub fn placements(&self) -> impl Iterator<Item = (UnitType, Coord)> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.cells.iter().map(move |&at| (g.role.unit(), at)))
    }
}

/// The full, immutable set of tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefenseLayout {
    tiers: Vec<PriorityTier>,
}

fn group(role: Role, cells: &[(u8, u8)]) -> RoleGroup {
    RoleGroup {
        role,
        cells: cells.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
    }
}

impl DefenseLayout {
    /// Create a layout from tiers in their initial priority order.
    #[must_use]
    pub fn new(tiers: Vec<PriorityTier>) -> Self {
        Self { tiers }
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the layout has no tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier by its layout index.
    #[must_use]
    pub fn tier(&self, index: usize) -> Option<&PriorityTier> {
        self.tiers.get(index)
    }
}

impl Default for DefenseLayout {
    /// Right-leaning funnel: a diagonal wall from the right corner toward the
    /// centre, turrets massed on the left corner, then reinforcements.
    fn default() -> Self {
        let core = PriorityTier::new(vec![
            group(
                Role::Wall,
                &[
                    (27, 13), (26, 12), (25, 11), (7, 10), (24, 10), (8, 9), (23, 9),
                    (9, 8), (22, 8), (10, 7), (21, 7), (11, 6), (20, 6), (12, 5),
                    (19, 5), (13, 4), (18, 4), (14, 3), (15, 3), (16, 3), (17, 3),
                ],
            ),
            group(Role::Turret, &[(0, 13), (25, 12), (5, 11), (6, 11)]),
            group(Role::Support, &[(14, 2)]),
        ]);
        let left_corner = PriorityTier::new(vec![
            group(
                Role::Wall,
                &[(1, 13), (2, 12), (6, 12), (7, 12), (8, 11), (9, 10), (10, 9), (10, 8)],
            ),
            group(
                Role::Turret,
                &[
                    (1, 12), (4, 12), (5, 12), (2, 11), (4, 11), (7, 11), (6, 10),
                    (8, 10), (7, 9), (9, 9), (8, 8),
                ],
            ),
        ]);
        let right_corner = PriorityTier::new(vec![
            group(
                Role::Wall,
                &[
                    (20, 13), (21, 13), (22, 13), (23, 13), (24, 13), (25, 13), (26, 13),
                    (20, 12), (21, 12), (20, 11), (20, 10),
                ],
            ),
            group(Role::Turret, &[(22, 12)]),
        ]);
        let right_pocket = PriorityTier::new(vec![
            group(Role::Wall, &[(24, 12), (22, 11), (21, 10)]),
            group(Role::Turret, &[(23, 12), (21, 11), (23, 11), (24, 11), (22, 10)]),
        ]);
        let support_line = PriorityTier::new(vec![group(
            Role::Support,
            &[(5, 10), (6, 9), (7, 8), (8, 7), (9, 6)],
        )]);

        Self::new(vec![core, left_corner, right_corner, right_pocket, support_line])
    }
}

/// Build order over a [`DefenseLayout`]: position `k` holds the layout index
/// of the tier built `k`-th.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierOrder {
    order: Vec<usize>,
}

impl TierOrder {
    /// The identity order for `len` tiers.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            order: (0..len).collect(),
        }
    }

    /// Layout indices in build order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// This order with positions `a` and `b` exchanged.
    ///
    /// Out-of-range positions leave the order unchanged.
    #[must_use]
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut order = self.order.clone();
        if a < order.len() && b < order.len() {
            order.swap(a, b);
        }
        Self { order }
    }

    /// Move the right-flank tiers forward: swap positions 1 and 3, then 3 and 2.
    #[must_use]
    pub fn rotated_toward_right_flank(&self) -> Self {
        self.swapped(1, 3).swapped(3, 2)
    }

    /// Whether this is a permutation of `0..len`.
    #[must_use]
    pub fn is_permutation_of(&self, len: usize) -> bool {
        let mut sorted = self.order.clone();
        sorted.sort_unstable();
        sorted.len() == len && sorted.iter().enumerate().all(|(i, &v)| i == v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_shape() {
        let layout = DefenseLayout::default();
        assert_eq!(layout.len(), 5);

        let core = layout.tier(0).unwrap();
        let roles: Vec<Role> = core.groups().iter().map(|g| g.role).collect();
        assert_eq!(roles, vec![Role::Wall, Role::Turret, Role::Support]);
        assert_eq!(core.placements().count(), 21 + 4 + 1);

        let support_line = layout.tier(4).unwrap();
        assert!(support_line
            .placements()
            .all(|(unit, _)| unit == UnitType::Support));
    }

    #[test]
    fn test_tier_groups_sorted_by_role() {
        let tier = PriorityTier::new(vec![
            group(Role::Support, &[(9, 6)]),
            group(Role::Wall, &[(1, 13)]),
            group(Role::Turret, &[(2, 12)]),
        ]);
        let units: Vec<UnitType> = tier.placements().map(|(u, _)| u).collect();
        assert_eq!(units, vec![UnitType::Wall, UnitType::Turret, UnitType::Support]);
    }

    #[test]
    fn test_rotation() {
        let order = TierOrder::identity(5).rotated_toward_right_flank();
        assert_eq!(order.as_slice(), &[0, 3, 1, 2, 4]);
        assert!(order.is_permutation_of(5));

        // Three rotations bring the order back.
        let cycled = order
            .rotated_toward_right_flank()
            .rotated_toward_right_flank();
        assert_eq!(cycled, TierOrder::identity(5));
    }

    #[test]
    fn test_swap_out_of_range_is_noop() {
        let order = TierOrder::identity(3);
        assert_eq!(order.swapped(1, 3), order);
        assert_eq!(order.rotated_toward_right_flank(), order);
    }
}
