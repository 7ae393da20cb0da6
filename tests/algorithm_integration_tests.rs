//! Integration tests for the full planning flow.

use beat_route::cancel::CancellationToken;
use beat_route::config::{Config, PipelineSpec, Refinement};
use beat_route::construction::Construction;
use beat_route::error::{Error, Result};
use beat_route::problem::{CostMatrix, Coordinate, Point, Problem};
use beat_route::provider::{
    CostMatrixProvider, JsonMatrixProvider, StraightLineProvider, TravelMatrices,
};
use beat_route::{plan_route, validate_request, PlanRequest, RouteOptimizer};
use std::cell::Cell;

/// Wraps a provider and counts how often it is asked for matrices.
struct CountingProvider<P> {
    inner: P,
    calls: Cell<usize>,
}

impl<P: CostMatrixProvider> CountingProvider<P> {
    fn new(inner: P) -> Self {
        CountingProvider {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<P: CostMatrixProvider> CostMatrixProvider for CountingProvider<P> {
    fn fetch(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices> {
        self.calls.set(self.calls.get() + 1);
        self.inner.fetch(coordinates)
    }
}

/// Always fails, like a routing service that is down.
struct FailingProvider;

impl CostMatrixProvider for FailingProvider {
    fn fetch(&self, _coordinates: &[Coordinate]) -> Result<TravelMatrices> {
        Err(Error::provider_unavailable("503 from routing service"))
    }
}

/// Three destinations spaced tens of kilometres apart, with the small
/// hand-checked matrix: the best open path is 0 -> 1 -> 3 -> 2 at 45.
fn create_test_request() -> (PlanRequest, TravelMatrices) {
    let request = PlanRequest {
        name: "Beat A".to_string(),
        start: Some(Coordinate::new(12.90, 77.50)),
        destinations: vec![
            Point::new("A", 13.10, 77.50, Some("Alpha".to_string())),
            Point::new("B", 13.50, 77.90, None),
            Point::new("C", 13.30, 77.70, Some("Charlie".to_string())),
        ],
    };
    let distances = vec![
        vec![0.0, 10.0, 50.0, 30.0],
        vec![10.0, 0.0, 40.0, 15.0],
        vec![50.0, 40.0, 0.0, 20.0],
        vec![30.0, 15.0, 20.0, 0.0],
    ];
    let durations = distances
        .iter()
        .map(|row| row.iter().map(|d| d * 60.0).collect())
        .collect();
    (request, TravelMatrices::complete(distances, durations))
}

/// A request of `count` destinations scattered over a few kilometres.
fn create_scattered_request(count: usize) -> PlanRequest {
    let start = Coordinate::new(28.6139, 77.2090);
    let destinations = (0..count)
        .map(|k| {
            let angle = k as f64 * 2.399;
            let radius = 0.002 + 0.0009 * k as f64;
            Point::new(
                format!("D{k}"),
                start.lat + radius * angle.sin(),
                start.lng + radius * angle.cos(),
                None,
            )
        })
        .collect();
    PlanRequest {
        name: "Scattered".to_string(),
        start: Some(start),
        destinations,
    }
}

#[test]
fn test_plan_route_ranks_default_pipelines() {
    let (request, matrices) = create_test_request();
    let config = Config::new();

    let plan = plan_route(&request, &matrices, &config, &CancellationToken::new()).unwrap();

    assert_eq!(plan.options.len(), 5);
    assert_eq!(plan.selected_index(), 0);
    for option in plan.options.options() {
        assert!(option.route.is_permutation_of(3), "{}", option.name);
        assert_eq!(option.total_distance, option.route.cost(&plan.problem.distances));
    }
    for pair in plan.options.options().windows(2) {
        assert!(pair[0].total_distance <= pair[1].total_distance);
    }

    let best = plan.selected().unwrap();
    assert_eq!(best.route.stops(), &[0, 1, 3, 2]);
    assert_eq!(best.total_distance, 45.0);
    assert_eq!(best.total_duration, 2700.0);

    let ids: Vec<&str> = plan
        .ordered_destinations()
        .unwrap()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "C", "B"]);
}

#[test]
fn test_plan_route_is_deterministic() {
    let request = create_scattered_request(15);
    let provider = StraightLineProvider::default();
    let config = Config::new();

    let first = plan_route(&request, &provider, &config, &CancellationToken::new()).unwrap();
    let second = plan_route(&request, &provider, &config, &CancellationToken::new()).unwrap();

    let routes = |plan: &beat_route::RoutePlan| -> Vec<(String, Vec<usize>)> {
        plan.options
            .options()
            .iter()
            .map(|o| (o.name.clone(), o.route.stops().to_vec()))
            .collect()
    };
    assert_eq!(routes(&first), routes(&second));
}

#[test]
fn test_plan_route_on_scattered_destinations() {
    let request = create_scattered_request(20);
    let plan = plan_route(
        &request,
        &StraightLineProvider::default(),
        &Config::new(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(plan.problem.get_destination_count(), 20);
    for option in plan.options.options() {
        assert!(option.route.is_permutation_of(20), "{}", option.name);
        assert!(option.total_distance > 0.0);
        assert!(option.total_duration > 0.0);
    }
}

#[test]
fn test_selection() {
    let (request, matrices) = create_test_request();
    let mut plan =
        plan_route(&request, &matrices, &Config::new(), &CancellationToken::new()).unwrap();

    let last = plan.options.len() - 1;
    let name = plan.select(last).unwrap().name.clone();
    assert_eq!(plan.selected_index(), last);
    assert_eq!(plan.selected().unwrap().name, name);

    assert!(matches!(plan.select(last + 1), Err(Error::InvalidInput(_))));
    assert_eq!(plan.selected_index(), last);
}

#[test]
fn test_empty_request_is_rejected_before_fetch() {
    let (mut request, matrices) = create_test_request();
    request.destinations.clear();
    let provider = CountingProvider::new(matrices);

    let result = plan_route(&request, &provider, &Config::new(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn test_missing_start_is_rejected_before_fetch() {
    let (mut request, matrices) = create_test_request();
    request.start = None;
    let provider = CountingProvider::new(matrices);

    let result = plan_route(&request, &provider, &Config::new(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn test_invalid_coordinates_are_rejected() {
    let (mut request, _) = create_test_request();
    request.destinations[1].coordinate = Coordinate::new(123.0, 0.0);
    assert!(matches!(
        validate_request(&request),
        Err(Error::InvalidInput(_))
    ));

    let (mut request, _) = create_test_request();
    request.start = Some(Coordinate::new(0.0, f64::NAN));
    assert!(matches!(
        validate_request(&request),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_provider_failure_aborts_request() {
    let (request, _) = create_test_request();

    let result = plan_route(
        &request,
        &FailingProvider,
        &Config::new(),
        &CancellationToken::new(),
    );
    assert!(matches!(result, Err(Error::ProviderUnavailable(_))));

    let missing = JsonMatrixProvider::new("does/not/exist.json");
    let result = plan_route(&request, &missing, &Config::new(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::ProviderUnavailable(_))));
}

#[test]
fn test_incomplete_matrix_fails_fast() {
    let (request, mut matrices) = create_test_request();
    matrices.distances[2][3] = None;

    let result = plan_route(&request, &matrices, &Config::new(), &CancellationToken::new());
    match result {
        Err(Error::MatrixIncomplete { matrix, .. }) => assert_eq!(matrix, "distance"),
        other => panic!("expected MatrixIncomplete, got {:?}", other.map(|_| ())),
    }

    // A matrix for the wrong number of points
    let (request, _) = create_test_request();
    let small = TravelMatrices::complete(
        vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        vec![vec![0.0, 1.0], vec![1.0, 0.0]],
    );
    let result = plan_route(&request, &small, &Config::new(), &CancellationToken::new());
    assert!(matches!(result, Err(Error::MatrixIncomplete { .. })));
}

#[test]
fn test_cancelled_request_returns_nothing() {
    let (request, matrices) = create_test_request();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = plan_route(&request, &matrices, &Config::new(), &cancel);
    assert!(matches!(result, Err(Error::Cancelled)));

    // A clone shares the flag
    let shared = CancellationToken::new();
    let handle = shared.clone();
    assert!(shared.check().is_ok());
    handle.cancel();
    assert!(shared.is_cancelled());
    assert!(matches!(shared.check(), Err(Error::Cancelled)));
}

#[test]
fn test_optimizer_without_destinations() {
    let problem = Problem::new(
        "Empty",
        Coordinate::new(0.0, 0.0),
        Vec::new(),
        CostMatrix::from_complete("distance", vec![vec![0.0]]).unwrap(),
        CostMatrix::from_complete("duration", vec![vec![0.0]]).unwrap(),
    )
    .unwrap();
    let config = Config::new();

    let ranked = RouteOptimizer::new(&problem, &config)
        .run(&CancellationToken::new())
        .unwrap();
    assert_eq!(ranked.len(), 5);
    for option in ranked.options() {
        assert_eq!(option.route.stops(), &[0]);
        assert_eq!(option.total_distance, 0.0);
        assert_eq!(option.total_duration, 0.0);
    }
}

#[test]
fn test_custom_pipelines() {
    let (request, matrices) = create_test_request();
    let config = Config::new().with_pipelines(vec![
        PipelineSpec::new(
            "Raw Geographic",
            "unrefined",
            Construction::GeographicSort,
            Refinement::None,
            None,
        ),
        PipelineSpec::new(
            "Farthest + Flow",
            "refined and regrouped",
            Construction::FarthestInsertion,
            Refinement::TwoOpt,
            Some(0.0),
        ),
    ]);

    let plan = plan_route(&request, &matrices, &config, &CancellationToken::new()).unwrap();
    let names: Vec<&str> = plan.options.options().iter().map(|o| o.name.as_str()).collect();

    // Equal distances keep declaration order
    assert_eq!(names, vec!["Raw Geographic", "Farthest + Flow"]);
    assert!(plan
        .options
        .options()
        .iter()
        .all(|o| o.total_distance == 45.0));
}

#[test]
fn test_run_pipeline_checks_cancellation() {
    let (request, matrices) = create_test_request();
    let start = request.start.unwrap();
    let problem = Problem::new(
        request.name.clone(),
        start,
        request.destinations.clone(),
        CostMatrix::from_rows("distance", &matrices.distances, 4).unwrap(),
        CostMatrix::from_rows("duration", &matrices.durations, 4).unwrap(),
    )
    .unwrap();
    let config = Config::new();
    let optimizer = RouteOptimizer::new(&problem, &config);

    let cancel = CancellationToken::new();
    let route = optimizer
        .run_pipeline(&config.pipelines[0], &cancel)
        .unwrap();
    assert_eq!(route.stops(), &[0, 1, 3, 2]);

    cancel.cancel();
    assert!(matches!(
        optimizer.run_pipeline(&config.pipelines[0], &cancel),
        Err(Error::Cancelled)
    ));
}
