//! Unit tests for the construction heuristics.

use beat_route::clusters::{detect_clusters, ClusterKind};
use beat_route::config::Config;
use beat_route::construction::*;
use beat_route::problem::CostMatrix;
use beat_route::solution::Route;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Start plus three destinations with symmetric distances:
/// d(0,1)=10, d(0,2)=50, d(0,3)=30, d(1,2)=40, d(1,3)=15, d(2,3)=20.
fn create_test_matrix() -> CostMatrix {
    CostMatrix::from_complete(
        "distance",
        vec![
            vec![0.0, 10.0, 50.0, 30.0],
            vec![10.0, 0.0, 40.0, 15.0],
            vec![50.0, 40.0, 0.0, 20.0],
            vec![30.0, 15.0, 20.0, 0.0],
        ],
    )
    .unwrap()
}

/// Points on a straight line; cost is the absolute difference of positions.
fn create_line_matrix(positions: &[f64]) -> CostMatrix {
    let rows = positions
        .iter()
        .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
        .collect();
    CostMatrix::from_complete("distance", rows).unwrap()
}

/// Every off-diagonal entry equals `c`.
fn create_constant_matrix(n: usize, c: f64) -> CostMatrix {
    let rows = (0..=n)
        .map(|i| (0..=n).map(|j| if i == j { 0.0 } else { c }).collect())
        .collect();
    CostMatrix::from_complete("distance", rows).unwrap()
}

#[test]
fn test_nearest_neighbor_small_instance() {
    let matrix = create_test_matrix();
    let route = nearest_neighbor(&matrix);

    assert_eq!(route.stops(), &[0, 1, 3, 2]);
    assert_eq!(route.cost(&matrix), 45.0);
}

#[test]
fn test_nearest_neighbor_ties_go_to_lowest_index() {
    let matrix = CostMatrix::from_complete(
        "distance",
        vec![
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 3.0, 3.0],
            vec![5.0, 3.0, 0.0, 3.0],
            vec![5.0, 3.0, 3.0, 0.0],
        ],
    )
    .unwrap();

    assert_eq!(nearest_neighbor(&matrix).stops(), &[0, 1, 2, 3]);
}

#[test]
fn test_constant_matrix_gives_n_times_c() {
    let n = 7;
    let c = 12.5;
    let matrix = create_constant_matrix(n, c);
    let config = Config::new();

    assert_eq!(nearest_neighbor(&matrix).cost(&matrix), n as f64 * c);
    assert_eq!(geographic_sort(&matrix).cost(&matrix), n as f64 * c);

    // Any order costs the same, so the other heuristics agree
    assert_eq!(farthest_insertion(&matrix).cost(&matrix), n as f64 * c);
    assert_eq!(
        randomized_nearest_neighbor(&matrix, 5, 1).cost(&matrix),
        n as f64 * c
    );
    assert_eq!(
        cluster_aware_greedy(&matrix, &config).cost(&matrix),
        n as f64 * c
    );
}

#[test]
fn test_empty_problem_gives_start_only() {
    let matrix = CostMatrix::from_complete("distance", vec![vec![0.0]]).unwrap();
    let config = Config::new();

    for construction in [
        Construction::NearestNeighbor,
        Construction::RandomizedNearestNeighbor,
        Construction::FarthestInsertion,
        Construction::GeographicSort,
        Construction::ClusterAwareGreedy,
    ] {
        let route = construction.build(&matrix, &config);
        assert_eq!(route, Route::start_only(), "{}", construction.label());
        assert_eq!(route.cost(&matrix), 0.0);
    }
}

#[test]
fn test_single_destination() {
    let matrix = create_line_matrix(&[0.0, 42.0]);
    let config = Config::new();

    for construction in [
        Construction::NearestNeighbor,
        Construction::RandomizedNearestNeighbor,
        Construction::FarthestInsertion,
        Construction::GeographicSort,
        Construction::ClusterAwareGreedy,
    ] {
        assert_eq!(construction.build(&matrix, &config).stops(), &[0, 1]);
    }
}

#[test]
fn test_farthest_insertion_small_instance() {
    let matrix = create_test_matrix();

    // Seeds with 2 (farthest from start), inserts 3 before it, then 1 in front.
    let route = farthest_insertion(&matrix);
    assert_eq!(route.stops(), &[0, 1, 3, 2]);
    assert_eq!(route.cost(&matrix), 45.0);
}

#[test]
fn test_insertion_cost_is_open_path() {
    let matrix = create_test_matrix();
    let route = Route::new(vec![0, 1, 2]).unwrap();

    // Between 0 and 1: d(0,3) + d(3,1) - d(0,1)
    assert_eq!(insertion_cost(&route, 1, 3, &matrix), 30.0 + 15.0 - 10.0);
    // Between 1 and 2: d(1,3) + d(3,2) - d(1,2)
    assert_eq!(insertion_cost(&route, 2, 3, &matrix), 15.0 + 20.0 - 40.0);
    // After the last stop there is no leg back to the start
    assert_eq!(insertion_cost(&route, 3, 3, &matrix), 20.0);
}

#[test]
fn test_farthest_insertion_on_line() {
    let matrix = create_line_matrix(&[0.0, 10.0, 20.0, 30.0, 40.0]);
    let route = farthest_insertion(&matrix);

    assert!(route.is_permutation_of(4));
    assert_eq!(route.stops(), &[0, 1, 2, 3, 4]);
    assert_eq!(route.cost(&matrix), 40.0);
}

#[test]
fn test_geographic_sort_orders_by_start_distance() {
    let matrix = create_test_matrix();
    assert_eq!(geographic_sort(&matrix).stops(), &[0, 1, 3, 2]);

    // Equal distances keep index order
    let matrix = create_line_matrix(&[0.0, 20.0, -10.0, 10.0, -20.0]);
    assert_eq!(geographic_sort(&matrix).stops(), &[0, 2, 3, 1, 4]);
}

#[test]
fn test_randomized_nearest_neighbor_is_reproducible() {
    let matrix = create_line_matrix(&[0.0, 7.0, -3.0, 12.0, 4.0, -9.0, 15.0, 1.0]);

    let first = randomized_nearest_neighbor(&matrix, 10, 42);
    let second = randomized_nearest_neighbor(&matrix, 10, 42);
    assert_eq!(first, second);
    assert!(first.is_permutation_of(7));

    // The seeded entry point is the same generator fed through an explicit rng
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let explicit = randomized_nearest_neighbor_with_rng(&matrix, 10, &mut rng);
    assert_eq!(first, explicit);
}

#[test]
fn test_randomized_nearest_neighbor_keeps_best_trial() {
    let matrix = create_test_matrix();

    // Starting at 1 gives 45; starting at 2 or 3 gives 85.
    let route = randomized_nearest_neighbor(&matrix, 50, 7);
    assert_eq!(route.stops(), &[0, 1, 3, 2]);
}

#[test]
fn test_randomized_nearest_neighbor_runs_at_least_one_trial() {
    let matrix = create_test_matrix();
    let route = randomized_nearest_neighbor(&matrix, 0, 3);
    assert!(route.is_permutation_of(3));
}

#[test]
fn test_remaining_nearest_to() {
    let matrix = create_test_matrix();
    let mut remaining = Remaining::destinations(3);

    assert_eq!(remaining.len(), 3);
    assert_eq!(remaining.nearest_to(0, &matrix), Some(1));
    assert!(remaining.remove(1));
    assert!(!remaining.remove(1));
    assert!(!remaining.contains(1));
    assert_eq!(remaining.nearest_to(0, &matrix), Some(3));
    assert_eq!(remaining.first(), Some(2));

    let empty = Remaining::default();
    assert!(empty.is_empty());
    assert_eq!(empty.nearest_to(0, &matrix), None);
}

#[test]
fn test_nearest_chain_over_subset() {
    let matrix = create_line_matrix(&[0.0, 10.0, 20.0, 30.0, 40.0]);
    let order = nearest_chain(4, Remaining::from_indices([1, 2, 3]), &matrix);
    assert_eq!(order, vec![3, 2, 1]);
}

#[test]
fn test_cluster_aware_greedy_consumes_cluster() {
    // 1 is isolated near the start, {2, 3, 5} is a tight group, 4 is far away.
    let matrix = create_line_matrix(&[0.0, 1000.0, 3200.0, 3000.0, 6000.0, 3100.0]);
    let config = Config::new();

    let clusters = detect_clusters(
        &matrix,
        config.micro_cluster_threshold,
        config.regular_cluster_threshold,
    );
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, ClusterKind::Micro);
    assert_eq!(clusters[0].members, vec![2, 3, 5]);

    let route = cluster_aware_greedy(&matrix, &config);
    assert_eq!(route.stops(), &[0, 1, 3, 5, 2, 4]);
}

#[test]
fn test_cluster_aware_greedy_switches_to_chaining_above_limit() {
    // All three destinations form one micro-cluster entered from the start
    let matrix = create_line_matrix(&[0.0, 10.0, 25.0, -12.0]);
    let clusters = detect_clusters(&matrix, 500.0, 2000.0);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![1, 2, 3]);

    // Exhaustive search goes to -12 first: 12 + 22 + 15
    let exhaustive = cluster_aware_greedy(&matrix, &Config::new());
    assert_eq!(exhaustive.stops(), &[0, 3, 1, 2]);
    assert_eq!(exhaustive.cost(&matrix), 49.0);

    // Chaining takes the nearest first and has to double back: 10 + 15 + 37
    let config = Config::new().with_exhaustive_cluster_limit(2);
    let chained = cluster_aware_greedy(&matrix, &config);
    assert_eq!(chained.stops(), &[0, 1, 2, 3]);
    assert_eq!(chained.cost(&matrix), 62.0);

    // The limit is inclusive
    let config = Config::new().with_exhaustive_cluster_limit(3);
    assert_eq!(cluster_aware_greedy(&matrix, &config), exhaustive);
}

#[test]
fn test_cluster_aware_greedy_without_clusters_is_nearest_neighbor() {
    let matrix = create_line_matrix(&[0.0, 5000.0, -12000.0, 20000.0, 9000.0]);
    let config = Config::new();

    assert!(detect_clusters(&matrix, 500.0, 2000.0).is_empty());
    assert_eq!(
        cluster_aware_greedy(&matrix, &config),
        nearest_neighbor(&matrix)
    );
}
