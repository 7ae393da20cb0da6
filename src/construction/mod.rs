//! Construction heuristics producing an initial visiting order.
//!
//! Every builder works on a cost matrix alone, keeps index 0 first and
//! threads an explicit [`Remaining`] collection through its own call.

pub mod cluster_greedy;
pub mod farthest_insertion;
pub mod geographic;
pub mod nearest_neighbor;
pub mod randomized;

pub use self::cluster_greedy::cluster_aware_greedy;
pub use self::farthest_insertion::{farthest_insertion, insertion_cost};
pub use self::geographic::geographic_sort;
pub use self::nearest_neighbor::{chain_nearest, nearest_chain, nearest_neighbor};
pub use self::randomized::{randomized_nearest_neighbor, randomized_nearest_neighbor_with_rng};

use crate::config::Config;
use crate::problem::CostMatrix;
use crate::solution::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Destinations not yet placed by a construction call.
///
/// Iteration is in ascending index order, which makes "first found" mean
/// "lowest index" for every tie-break built on top of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remaining {
    indices: BTreeSet<usize>,
}

impl Remaining {
    /// All destinations `1..=n`.
    pub fn destinations(n: usize) -> Self {
        Remaining {
            indices: (1..=n).collect(),
        }
    }

    /// An explicit subset of indices.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Remaining {
            indices: indices.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Remove an index, returning whether it was still remaining.
    pub fn remove(&mut self, index: usize) -> bool {
        self.indices.remove(&index)
    }

    /// Lowest remaining index.
    pub fn first(&self) -> Option<usize> {
        self.indices.iter().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Remaining index with the smallest cost from `from`; lowest index on ties.
    pub fn nearest_to(&self, from: usize, matrix: &CostMatrix) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for candidate in self.iter() {
            let cost = matrix.get(from, candidate);
            if !cost.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((candidate, cost));
            }
        }
        best.map(|(candidate, _)| candidate)
    }
}

/// The available construction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    NearestNeighbor,
    RandomizedNearestNeighbor,
    FarthestInsertion,
    GeographicSort,
    ClusterAwareGreedy,
}

impl Construction {
    /// Build an initial route for `matrix` with this heuristic.
    pub fn build(&self, matrix: &CostMatrix, config: &Config) -> Route {
        match self {
            Construction::NearestNeighbor => nearest_neighbor(matrix),
            Construction::RandomizedNearestNeighbor => {
                randomized_nearest_neighbor(matrix, config.randomized_trials, config.seed)
            }
            Construction::FarthestInsertion => farthest_insertion(matrix),
            Construction::GeographicSort => geographic_sort(matrix),
            Construction::ClusterAwareGreedy => cluster_aware_greedy(matrix, config),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Construction::NearestNeighbor => "nearest neighbor",
            Construction::RandomizedNearestNeighbor => "randomized nearest neighbor",
            Construction::FarthestInsertion => "farthest insertion",
            Construction::GeographicSort => "geographic sort",
            Construction::ClusterAwareGreedy => "cluster-aware greedy",
        }
    }
}
