//! Cost-matrix clusters and their internal ordering.
//!
//! Clusters are single-linkage groups: two destinations are linked when
//! their mutual cost (the larger of both directions) is within a threshold,
//! and a cluster is a connected component of that relation. Micro-clusters
//! use the tight threshold; regular clusters are formed from the points left
//! over, using the wider one.

use crate::construction::{nearest_chain, Remaining};
use crate::problem::CostMatrix;
use itertools::Itertools;
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    Micro,
    Regular,
}

/// A group of at least two destination indices, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub kind: ClusterKind,
    pub members: Vec<usize>,
}

/// Detect micro and regular clusters among destinations `1..=n`.
///
/// Isolated points belong to no cluster. The result is sorted by lowest member.
pub fn detect_clusters(
    matrix: &CostMatrix,
    micro_threshold: f64,
    regular_threshold: f64,
) -> Vec<Cluster> {
    let n = matrix.size().saturating_sub(1);
    let destinations: Vec<usize> = (1..=n).collect();

    let mut clusters = Vec::new();
    let mut loose = Vec::new();
    for component in link_components(matrix, &destinations, micro_threshold) {
        if component.len() >= 2 {
            clusters.push(Cluster {
                kind: ClusterKind::Micro,
                members: component,
            });
        } else {
            loose.extend(component);
        }
    }

    for component in link_components(matrix, &loose, regular_threshold) {
        if component.len() >= 2 {
            clusters.push(Cluster {
                kind: ClusterKind::Regular,
                members: component,
            });
        }
    }

    clusters.sort_by_key(|cluster| cluster.members[0]);
    clusters
}

/// Connected components of `points` under "mutual cost within `threshold`".
///
/// Components keep the order of `points`, and are listed by first member.
fn link_components(matrix: &CostMatrix, points: &[usize], threshold: f64) -> Vec<Vec<usize>> {
    let mut links = UnionFind::<usize>::new(points.len());
    for (a, b) in (0..points.len()).tuple_combinations() {
        if matrix.mutual(points[a], points[b]) <= threshold {
            links.union(a, b);
        }
    }

    let labels = links.into_labeling();
    let mut slot_of_label: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for (position, &label) in labels.iter().enumerate() {
        let slot = *slot_of_label.entry(label).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(points[position]);
    }
    components
}

/// Cost of entering `order` from `from` and walking it as an open path.
pub fn entry_path_cost(matrix: &CostMatrix, from: usize, order: &[usize]) -> f64 {
    match order.first() {
        Some(&first) => matrix.get(from, first) + matrix.path_cost(order),
        None => 0.0,
    }
}

/// The cheapest order of `members` when entered from `from`, by trying every permutation.
///
/// Meant for micro-clusters; the work grows factorially with `members.len()`.
/// The first of equally cheap orders, in lexicographic permutation order of
/// `members`, is returned.
pub fn optimal_order(matrix: &CostMatrix, from: usize, members: &[usize]) -> Vec<usize> {
    if members.len() <= 1 {
        return members.to_vec();
    }

    let mut best: Option<(Vec<usize>, f64)> = None;
    for order in members.iter().copied().permutations(members.len()) {
        let cost = entry_path_cost(matrix, from, &order);
        if best.as_ref().map_or(true, |(_, best_cost)| cost < *best_cost) {
            best = Some((order, cost));
        }
    }

    best.map(|(order, _)| order).unwrap_or_else(|| members.to_vec())
}

/// Order `members` by nearest-neighbor chaining from `from`.
pub fn chain_order(matrix: &CostMatrix, from: usize, members: &[usize]) -> Vec<usize> {
    nearest_chain(from, Remaining::from_indices(members.iter().copied()), matrix)
}
