//! Randomized nearest-neighbor construction with restarts.

use super::{chain_nearest, nearest_neighbor, Remaining};
use crate::problem::CostMatrix;
use crate::solution::Route;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Run `trials` nearest-neighbor constructions, each from a uniformly random
/// first destination, and keep the one with the lowest open-path distance.
///
/// The random source is created from `seed` for this call only, so equal
/// inputs always give equal routes.
pub fn randomized_nearest_neighbor(matrix: &CostMatrix, trials: usize, seed: u64) -> Route {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    randomized_nearest_neighbor_with_rng(matrix, trials, &mut rng)
}

/// Same as [`randomized_nearest_neighbor`] with a caller-supplied random source.
///
/// At least one trial is always run. The first of equally short trials wins.
pub fn randomized_nearest_neighbor_with_rng<R: Rng + ?Sized>(
    matrix: &CostMatrix,
    trials: usize,
    rng: &mut R,
) -> Route {
    let n = matrix.size().saturating_sub(1);
    if n == 0 {
        return Route::start_only();
    }

    let mut best: Option<(Route, f64)> = None;
    for trial in 0..trials.max(1) {
        let first = rng.gen_range(1..=n);
        let mut remaining = Remaining::destinations(n);
        remaining.remove(first);

        let route = chain_nearest(Route::start_only().appended(first), remaining, matrix);
        let distance = route.cost(matrix);
        trace!("randomized trial {trial}: first stop {first}, distance {distance:.2}");

        if best.as_ref().map_or(true, |(_, best_distance)| distance < *best_distance) {
            best = Some((route, distance));
        }
    }

    match best {
        Some((route, _)) => route,
        None => nearest_neighbor(matrix),
    }
}
