//! Local search refinement of open-path routes.

pub mod two_opt;

use crate::problem::CostMatrix;
use crate::solution::Route;
use log::trace;
use serde::{Deserialize, Serialize};

/// Smallest distance reduction treated as an improvement.
pub const MIN_GAIN: f64 = 1e-6;

/// Extra condition a strictly improving 2-opt move must meet to be applied.
///
/// A move passes when its gain exceeds `min_improvement`, or when the two
/// reversal endpoints are within `proximity` of each other. The open gate
/// (`min_improvement = 0`, no proximity) accepts every strict improvement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceGate {
    pub min_improvement: f64,
    pub proximity: Option<f64>,
}

impl AcceptanceGate {
    pub fn new(min_improvement: f64, proximity: Option<f64>) -> Self {
        AcceptanceGate {
            min_improvement,
            proximity,
        }
    }

    /// Accept every strictly improving move.
    pub fn open() -> Self {
        AcceptanceGate::new(0.0, None)
    }

    /// Decide on a move with the given gain and endpoint distance.
    pub fn accepts(&self, gain: f64, endpoint_distance: f64) -> bool {
        gain > self.min_improvement
            || self
                .proximity
                .map_or(false, |proximity| endpoint_distance <= proximity)
    }
}

impl Default for AcceptanceGate {
    fn default() -> Self {
        AcceptanceGate::open()
    }
}

/// What a refinement run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Full passes performed
    pub passes: usize,
    /// Reversals applied
    pub moves: usize,
    /// A pass finished without applying any move
    pub converged: bool,
}

/// 2-opt refinement with a pass cap and an acceptance gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSearch {
    pub max_passes: usize,
    pub gate: AcceptanceGate,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new(max_passes: usize, gate: AcceptanceGate) -> Self {
        LocalSearch { max_passes, gate }
    }

    /// Local search accepting every strict improvement.
    pub fn open(max_passes: usize) -> Self {
        LocalSearch::new(max_passes, AcceptanceGate::open())
    }

    /// Refine `route`, returning the improved route.
    pub fn refine(&self, route: &Route, matrix: &CostMatrix) -> Route {
        self.refine_with_stats(route, matrix).0
    }

    /// Refine `route`, returning the improved route and run statistics.
    ///
    /// Passes repeat until one applies no move or `max_passes` is reached.
    /// Each applied move strictly lowers the open-path distance, so the
    /// loop cannot cycle.
    pub fn refine_with_stats(&self, route: &Route, matrix: &CostMatrix) -> (Route, RefineStats) {
        let mut current = route.clone();
        let mut stats = RefineStats::default();

        while stats.passes < self.max_passes {
            stats.passes += 1;
            let (next, moves) = self.two_opt_pass(&current, matrix);
            current = next;
            stats.moves += moves;

            if moves == 0 {
                stats.converged = true;
                break;
            }
        }

        trace!(
            "2-opt: {} passes, {} moves, converged: {}",
            stats.passes,
            stats.moves,
            stats.converged
        );
        (current, stats)
    }
}
