//! 2-Opt neighborhood for open paths.

use crate::problem::CostMatrix;
use crate::solution::Route;

use super::{LocalSearch, MIN_GAIN};

impl LocalSearch {
    /// Run one full pass over all position pairs `1 <= i < j`, applying every
    /// move that improves the current route and passes the gate.
    ///
    /// Returns the resulting route and the number of moves applied.
    pub fn two_opt_pass(&self, route: &Route, matrix: &CostMatrix) -> (Route, usize) {
        let mut current = route.clone();
        let mut moves = 0;
        let len = current.len();

        if len < 3 {
            return (current, 0);
        }

        for i in 1..len - 1 {
            for j in i + 1..len {
                let gain = -Self::evaluate_two_opt(&current, matrix, i, j);
                if gain <= MIN_GAIN {
                    continue;
                }

                let stops = current.stops();
                let endpoint_distance = matrix.mutual(stops[i], stops[j]);
                if self.gate.accepts(gain, endpoint_distance) {
                    current = current.with_reversed(i, j);
                    moves += 1;
                }
            }
        }

        (current, moves)
    }

    /// Distance change of reversing positions `i..=j` (negative is better).
    ///
    /// The reversed segment is re-costed in its new direction, so asymmetric
    /// matrices are handled exactly. Reversing a tail has no outgoing leg.
    pub fn evaluate_two_opt(route: &Route, matrix: &CostMatrix, i: usize, j: usize) -> f64 {
        let stops = route.stops();
        let prev = stops[i - 1];

        let mut old_cost = matrix.get(prev, stops[i]);
        let mut new_cost = matrix.get(prev, stops[j]);

        for k in i..j {
            old_cost += matrix.get(stops[k], stops[k + 1]);
            new_cost += matrix.get(stops[k + 1], stops[k]);
        }

        if let Some(&next) = stops.get(j + 1) {
            old_cost += matrix.get(stops[j], next);
            new_cost += matrix.get(stops[i], next);
        }

        new_cost - old_cost
    }
}
