//! Greedy construction that visits whole clusters at once.

use super::Remaining;
use crate::clusters::{chain_order, detect_clusters, optimal_order};
use crate::config::Config;
use crate::problem::CostMatrix;
use crate::solution::Route;
use log::{debug, warn};
use std::collections::HashMap;

/// Build a route greedily, consuming a whole cluster whenever the nearest
/// unvisited destination belongs to one.
///
/// Clusters of at most `config.exhaustive_cluster_limit` members are ordered
/// by exhaustive search (optimal for that subset, entry leg included); larger
/// ones by nearest-neighbor chaining. Isolated destinations are appended one
/// at a time.
pub fn cluster_aware_greedy(matrix: &CostMatrix, config: &Config) -> Route {
    let n = matrix.size().saturating_sub(1);
    let clusters = detect_clusters(
        matrix,
        config.micro_cluster_threshold,
        config.regular_cluster_threshold,
    );
    debug!(
        "cluster-aware greedy: {} clusters over {} destinations",
        clusters.len(),
        n
    );

    let owner: HashMap<usize, usize> = clusters
        .iter()
        .enumerate()
        .flat_map(|(c, cluster)| cluster.members.iter().map(move |&m| (m, c)))
        .collect();

    let mut remaining = Remaining::destinations(n);
    let mut route = Route::start_only();

    while !remaining.is_empty() {
        let current = route.last();
        let next = match remaining.nearest_to(current, matrix) {
            Some(next) => next,
            None => {
                warn!("no reachable destination from {current}, falling back to lowest index");
                match remaining.first() {
                    Some(next) => next,
                    None => break,
                }
            }
        };

        match owner.get(&next) {
            Some(&c) => {
                // A cluster is consumed atomically, so all its members are still remaining.
                let members = &clusters[c].members;
                let order = if members.len() <= config.exhaustive_cluster_limit {
                    optimal_order(matrix, current, members)
                } else {
                    chain_order(matrix, current, members)
                };
                for &member in &order {
                    remaining.remove(member);
                }
                route = route.extended(&order);
            }
            None => {
                remaining.remove(next);
                route = route.appended(next);
            }
        }
    }

    route
}
