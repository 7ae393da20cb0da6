//! Sequence-flow post-processing: regroup a refined route into spatial clusters.
//!
//! Clusters are formed by straight-line (haversine) distance, independently
//! of the cost matrix, and only decide the visiting sequence. Each cluster is
//! seeded by the first unclustered stop in route order and absorbs every
//! unclustered stop within the radius *of that seed*; membership is not
//! transitive.

use crate::clusters::chain_order;
use crate::problem::Problem;
use crate::solution::Route;

/// Flow clusterer for a single radius, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceFlow {
    pub radius: f64,
}

impl SequenceFlow {
    pub fn new(radius: f64) -> Self {
        SequenceFlow { radius }
    }

    /// Group the destinations of `route`, in route order.
    ///
    /// A radius that is not strictly positive groups nothing, so every stop
    /// is its own cluster (coincident points included).
    pub fn group(&self, route: &Route, problem: &Problem) -> Vec<Vec<usize>> {
        let stops = &route.stops()[1..];
        if self.radius.is_nan() || self.radius <= 0.0 {
            return stops.iter().map(|&stop| vec![stop]).collect();
        }

        let mut clustered = vec![false; stops.len()];
        let mut groups = Vec::new();

        for (s, &seed) in stops.iter().enumerate() {
            if clustered[s] {
                continue;
            }
            clustered[s] = true;
            let seed_at = problem.coordinate(seed);
            let mut group = vec![seed];

            for (o, &other) in stops.iter().enumerate().skip(s + 1) {
                if !clustered[o]
                    && seed_at.haversine_distance(&problem.coordinate(other)) <= self.radius
                {
                    clustered[o] = true;
                    group.push(other);
                }
            }
            groups.push(group);
        }

        groups
    }

    /// Reorder `route` cluster by cluster.
    ///
    /// Clusters are visited in ascending average cost from the start (stable
    /// for equal averages). Inside a cluster the nearest-neighbor chain starts
    /// from the previously placed stop, so the entry is the member closest to
    /// it. Singletons pass through unchanged.
    pub fn apply(&self, route: &Route, problem: &Problem) -> Route {
        if route.len() <= 2 {
            return route.clone();
        }

        let mut groups = self.group(route, problem);
        groups.sort_by(|a, b| {
            average_from_start(a, problem).total_cmp(&average_from_start(b, problem))
        });

        let mut flowed = Route::start_only();
        for group in &groups {
            flowed = if group.len() == 1 {
                flowed.appended(group[0])
            } else {
                let order = chain_order(&problem.distances, flowed.last(), group);
                flowed.extended(&order)
            };
        }

        debug_assert!(flowed.is_permutation_of(route.destination_count()));
        flowed
    }
}

fn average_from_start(group: &[usize], problem: &Problem) -> f64 {
    let total: f64 = group.iter().map(|&m| problem.get_distance(0, m)).sum();
    total / group.len() as f64
}
