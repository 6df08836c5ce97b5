//! Counter-unit allocation over the timing histogram.
//!
//! Each draw takes the heaviest bucket (lowest index on ties) and then
//! lowers that bucket by a fixed share of the original total. The share is
//! the same for every draw, so a dominant bucket can win several times and
//! weights can go negative.

use tracing::debug;

use crate::game::{Arena, Coord, UnitType};
use crate::strategy::HISTOGRAM_BUCKETS;

/// Defensive cell for a timing bucket: bucket `i` maps to `(i + 1, 12 - i)`
/// on our bottom-left edge.
///
/// The last bucket maps off the board and yields `None`.
#[must_use]
pub fn bucket_cell(bucket: usize) -> Option<Coord> {
    let x = u8::try_from(bucket + 1).ok()?;
    let y = 12u8.checked_sub(u8::try_from(bucket).ok()?)?;
    Some(Coord::new(x, y))
}

/// Number of counter-units warranted by the opponent's unit-resource,
/// never more than `cap`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn counter_unit_count(opponent_units: f64, divisor: f64, cap: usize) -> usize {
    if divisor <= 0.0 || opponent_units.is_nan() || opponent_units <= 0.0 {
        return 0;
    }
    (opponent_units / divisor).floor().min(cap as f64) as usize
}

/// Bucket chosen by each of `draws` greedy draws over `histogram`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn allocate(histogram: &[u32; HISTOGRAM_BUCKETS], draws: usize) -> Vec<usize> {
    if draws == 0 {
        return Vec::new();
    }
    let mut weights = histogram.map(f64::from);
    let total: f64 = weights.iter().sum();
    let step = total / draws as f64;

    let mut picks = Vec::new();
    for _ in 0..draws {
        let mut best = 0;
        for (i, &w) in weights.iter().enumerate().skip(1) {
            if w > weights[best] {
                best = i;
            }
        }
        weights[best] -= step;
        picks.push(best);
    }
    picks
}

/// Deploy counter-units at the predicted danger windows.
///
/// Returns how many deployments were requested.
pub fn deploy_counter_units<A: Arena + ?Sized>(
    arena: &mut A,
    histogram: &[u32; HISTOGRAM_BUCKETS],
    opponent_units: f64,
    divisor: f64,
    cap: usize,
) -> usize {
    let draws = counter_unit_count(opponent_units, divisor, cap);
    let mut requested = 0;
    for bucket in allocate(histogram, draws) {
        let Some(at) = bucket_cell(bucket) else {
            debug!(bucket, "no cell for bucket");
            continue;
        };
        arena.attempt_spawn(UnitType::Interceptor, at, 1);
        requested += 1;
    }
    requested
}
