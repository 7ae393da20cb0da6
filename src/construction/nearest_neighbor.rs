//! Nearest-neighbor construction.

use super::Remaining;
use crate::problem::CostMatrix;
use crate::solution::Route;

/// Build a route by always moving to the nearest unvisited destination.
///
/// Ties go to the lowest index, so the result is fully deterministic.
pub fn nearest_neighbor(matrix: &CostMatrix) -> Route {
    let n = matrix.size().saturating_sub(1);
    chain_nearest(Route::start_only(), Remaining::destinations(n), matrix)
}

/// Extend `route` with every index in `remaining`, nearest first.
pub fn chain_nearest(route: Route, remaining: Remaining, matrix: &CostMatrix) -> Route {
    let order = nearest_chain(route.last(), remaining, matrix);
    route.extended(&order)
}

/// Order every index in `remaining` by repeatedly stepping to the nearest one,
/// starting from `from`.
///
/// This is the single nearest-neighbor rule used across the crate: minimum
/// cost from the current point, lowest index on ties.
pub fn nearest_chain(from: usize, mut remaining: Remaining, matrix: &CostMatrix) -> Vec<usize> {
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = from;
    while let Some(next) = remaining
        .nearest_to(current, matrix)
        .or_else(|| remaining.first())
    {
        remaining.remove(next);
        order.push(next);
        current = next;
    }
    order
}
