//! Farthest-insertion construction for open paths.

use super::Remaining;
use crate::problem::CostMatrix;
use crate::solution::Route;

/// Build a route by repeatedly inserting the destination farthest from the
/// current route at its cheapest position.
///
/// The route is seeded with `[0, farthest-from-start]`. Selection maximises
/// the minimum cost from any routed point to the candidate. Insertion uses
/// the open-path cost: positions lie between consecutive stops or after the
/// last stop, and there is no leg back to the start. All ties go to the
/// lowest index or the earliest position.
pub fn farthest_insertion(matrix: &CostMatrix) -> Route {
    let n = matrix.size().saturating_sub(1);
    if n == 0 {
        return Route::start_only();
    }

    let mut remaining = Remaining::destinations(n);
    let Some(first) = farthest_from(0, &remaining, matrix) else {
        return Route::start_only();
    };
    remaining.remove(first);
    let mut route = Route::start_only().appended(first);

    // Minimum cost from the routed points to each index, for this call only.
    let mut to_route: Vec<f64> = (0..=n)
        .map(|c| matrix.get(0, c).min(matrix.get(first, c)))
        .collect();

    while let Some(next) = select_farthest(&remaining, &to_route) {
        remaining.remove(next);
        let position = cheapest_position(&route, next, matrix);
        route = route.inserted(position, next);

        for candidate in remaining.iter() {
            to_route[candidate] = to_route[candidate].min(matrix.get(next, candidate));
        }
    }

    route
}

/// Cost added by inserting `index` at `position` (`1..=route.len()`).
///
/// Inserting after the last stop only adds the leg into `index`.
pub fn insertion_cost(route: &Route, position: usize, index: usize, matrix: &CostMatrix) -> f64 {
    let stops = route.stops();
    let prev = stops[position - 1];
    match stops.get(position) {
        Some(&next) => matrix.get(prev, index) + matrix.get(index, next) - matrix.get(prev, next),
        None => matrix.get(prev, index),
    }
}

fn farthest_from(origin: usize, remaining: &Remaining, matrix: &CostMatrix) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for candidate in remaining.iter() {
        let cost = matrix.get(origin, candidate);
        if best.map_or(true, |(_, best_cost)| cost > best_cost) {
            best = Some((candidate, cost));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn select_farthest(remaining: &Remaining, to_route: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for candidate in remaining.iter() {
        let cost = to_route[candidate];
        if best.map_or(true, |(_, best_cost)| cost > best_cost) {
            best = Some((candidate, cost));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn cheapest_position(route: &Route, index: usize, matrix: &CostMatrix) -> usize {
    let mut best_position = route.len();
    let mut best_cost = f64::INFINITY;
    for position in 1..=route.len() {
        let cost = insertion_cost(route, position, index, matrix);
        if cost < best_cost {
            best_cost = cost;
            best_position = position;
        }
    }
    best_position
}
