//! # beat-route
//!
//! Plans the visiting order of a set of destinations from a fixed start,
//! minimising travel cost taken from an externally supplied cost matrix.
//! Routes are open paths: they never return to the start.
//!
//! Several pipelines run per request. Each builds an initial order with a
//! construction heuristic, refines it with 2-opt and may regroup it into
//! spatially coherent clusters. The resulting candidates are evaluated and
//! ranked by total distance, and the caller picks one.

pub mod cancel;
pub mod clusters;
pub mod config;
pub mod construction;
pub mod destinations;
pub mod error;
pub mod local_search;
pub mod problem;
pub mod provider;
pub mod ranking;
pub mod sequence_flow;
pub mod solution;
pub mod utils;

pub use crate::error::{Error, Result};

use crate::cancel::CancellationToken;
use crate::config::{Config, PipelineSpec, Refinement};
use crate::local_search::LocalSearch;
use crate::problem::{CostMatrix, Coordinate, Point, Problem};
use crate::provider::CostMatrixProvider;
use crate::ranking::RankedOptions;
use crate::sequence_flow::SequenceFlow;
use crate::solution::{Route, RouteOption};

use log::{debug, info, warn};

/// Runs the configured pipelines over one problem and ranks their results.
pub struct RouteOptimizer<'a> {
    pub problem: &'a Problem,
    pub config: &'a Config,
}

impl<'a> RouteOptimizer<'a> {
    /// Create an optimizer for the given problem and configuration.
    pub fn new(problem: &'a Problem, config: &'a Config) -> Self {
        RouteOptimizer { problem, config }
    }

    /// Run every pipeline and rank the candidates by total distance.
    ///
    /// Cancellation is checked before each pipeline stage; once observed,
    /// nothing computed so far is returned.
    pub fn run(&self, cancel: &CancellationToken) -> Result<RankedOptions> {
        let mut candidates = Vec::with_capacity(self.config.pipelines.len());

        for spec in &self.config.pipelines {
            let route = self.run_pipeline(spec, cancel)?;
            debug_assert!(route.is_permutation_of(self.problem.get_destination_count()));
            candidates.push((spec.name.clone(), spec.description.clone(), route));
        }

        let ranked = RankedOptions::evaluate(candidates, self.problem)?;
        if let Some(best) = ranked.best() {
            info!(
                "ranked {} route options, best: {} ({:.2})",
                ranked.len(),
                best.name,
                best.total_distance
            );
        }
        Ok(ranked)
    }

    /// Run a single pipeline: construction, refinement, then flow clustering.
    pub fn run_pipeline(&self, spec: &PipelineSpec, cancel: &CancellationToken) -> Result<Route> {
        let matrix = &self.problem.distances;

        cancel.check()?;
        let route = spec.construction.build(matrix, self.config);
        debug!(
            "{}: {} built {:.2}",
            spec.name,
            spec.construction.label(),
            route.cost(matrix)
        );

        cancel.check()?;
        let route = match self.local_search(spec.refinement) {
            Some(local_search) => {
                let refined = local_search.refine(&route, matrix);
                debug!("{}: refined to {:.2}", spec.name, refined.cost(matrix));
                refined
            }
            None => route,
        };

        cancel.check()?;
        let route = match spec.flow_radius {
            Some(radius) => {
                let flowed = SequenceFlow::new(radius).apply(&route, self.problem);
                debug!(
                    "{}: flow radius {radius} gives {:.2}",
                    spec.name,
                    flowed.cost(matrix)
                );
                flowed
            }
            None => route,
        };

        Ok(route)
    }

    fn local_search(&self, refinement: Refinement) -> Option<LocalSearch> {
        match refinement {
            Refinement::None => None,
            Refinement::TwoOpt => Some(LocalSearch::open(self.config.two_opt_max_passes)),
            Refinement::GatedTwoOpt => Some(LocalSearch::new(
                self.config.two_opt_max_passes,
                self.config.cluster_gate,
            )),
        }
    }
}

/// A planning request as received from the caller.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Label of the destination group being planned
    pub name: String,
    pub start: Option<Coordinate>,
    pub destinations: Vec<Point>,
}

/// Ranked options plus the caller's current choice among them.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub problem: Problem,
    pub options: RankedOptions,
    selected: usize,
}

impl RoutePlan {
    /// Wrap ranked options, selecting the shortest.
    pub fn new(problem: Problem, options: RankedOptions) -> Self {
        RoutePlan {
            problem,
            options,
            selected: 0,
        }
    }

    /// Index of the selected option.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected option.
    pub fn selected(&self) -> Result<&RouteOption> {
        self.options.get(self.selected)
    }

    /// Select another option by ranked index.
    pub fn select(&mut self, index: usize) -> Result<&RouteOption> {
        self.options.get(index)?;
        self.selected = index;
        self.selected()
    }

    /// Destinations of the selected option in visiting order.
    pub fn ordered_destinations(&self) -> Result<Vec<&Point>> {
        let option = self.selected()?;
        Ok(option
            .route
            .stops()
            .iter()
            .filter_map(|&stop| self.problem.destination(stop))
            .collect())
    }
}

/// Check a request before any provider or heuristic work happens.
pub fn validate_request(request: &PlanRequest) -> Result<Coordinate> {
    let start = request
        .start
        .ok_or_else(|| Error::invalid_input("no start location set"))?;
    let start = Coordinate::checked(start.lat, start.lng)?;

    if request.destinations.is_empty() {
        return Err(Error::invalid_input(format!(
            "no destinations selected for {}",
            request.name
        )));
    }
    for point in &request.destinations {
        Coordinate::checked(point.coordinate.lat, point.coordinate.lng).map_err(|e| {
            Error::invalid_input(format!("destination {}: {e}", point.id))
        })?;
    }
    Ok(start)
}

/// Plan one request end to end: validate, fetch matrices, optimize, rank.
pub fn plan_route<P: CostMatrixProvider + ?Sized>(
    request: &PlanRequest,
    provider: &P,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<RoutePlan> {
    let start = validate_request(request)?;
    info!(
        "planning {} with {} destinations",
        request.name,
        request.destinations.len()
    );

    let coordinates: Vec<Coordinate> = std::iter::once(start)
        .chain(request.destinations.iter().map(|p| p.coordinate))
        .collect();
    let size = coordinates.len();

    let matrices = provider.fetch(&coordinates)?;
    let distances = CostMatrix::from_rows("distance", &matrices.distances, size)?;
    let durations = CostMatrix::from_rows("duration", &matrices.durations, size)?;
    debug!("matrices fetched: {size}x{size}");

    let problem = Problem::new(
        request.name.clone(),
        start,
        request.destinations.clone(),
        distances,
        durations,
    )?;

    if let Err(e) = cancel.check() {
        warn!("planning {} cancelled before optimization", request.name);
        return Err(e);
    }
    let options = RouteOptimizer::new(&problem, config)
        .run(cancel)
        .map_err(|e| {
            if matches!(e, Error::Cancelled) {
                warn!("planning {} cancelled", request.name);
            }
            e
        })?;

    Ok(RoutePlan::new(problem, options))
}
