//! Shift build priority toward the flank we are being breached on.

use crate::game::Coord;
use crate::strategy::TierOrder;

/// Whether the most recent `sample` breaches lean to the right half.
///
/// Fewer breaches than `sample` means all of them are considered. Ties and
/// an empty history do not count as right-leaning.
#[must_use]
pub fn right_flank_pressure(breaches: &[Coord], sample: usize) -> bool {
    let recent = &breaches[breaches.len().saturating_sub(sample)..];
    let left = recent.iter().filter(|at| at.is_left_half()).count();
    let right = recent.len() - left;
    right > left
}

/// Next turn's build order given the breach history.
#[must_use]
pub fn reprioritize(order: &TierOrder, breaches: &[Coord], sample: usize) -> TierOrder {
    if right_flank_pressure(breaches, sample) {
        order.rotated_toward_right_flank()
    } else {
        order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(u8, u8)]) -> Vec<Coord> {
        pairs.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    #[test]
    fn test_right_majority_rotates() {
        let breaches = coords(&[(5, 5), (20, 5), (20, 6)]);
        let order = reprioritize(&TierOrder::identity(5), &breaches, 3);
        assert_eq!(order.as_slice(), &[0, 3, 1, 2, 4]);
    }

    #[test]
    fn test_left_majority_keeps_order() {
        let breaches = coords(&[(5, 5), (5, 6), (20, 5)]);
        let order = reprioritize(&TierOrder::identity(5), &breaches, 3);
        assert_eq!(order, TierOrder::identity(5));
    }

    #[test]
    fn test_only_recent_breaches_count() {
        // Older left-side breaches fall outside the sample.
        let breaches = coords(&[(1, 12), (2, 11), (3, 10), (20, 6), (21, 7), (5, 8)]);
        assert!(right_flank_pressure(&breaches, 3));
        assert!(!right_flank_pressure(&breaches, 6));
    }

    #[test]
    fn test_short_and_empty_history() {
        assert!(!right_flank_pressure(&[], 3));
        assert!(right_flank_pressure(&coords(&[(14, 0)]), 3));
        assert!(!right_flank_pressure(&coords(&[(13, 0)]), 3));
        // One each: tie.
        assert!(!right_flank_pressure(&coords(&[(13, 0), (14, 0)]), 3));
    }
}
