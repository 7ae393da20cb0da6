//! Route and route option representation.

use crate::error::{Error, Result};
use crate::problem::{CostMatrix, Problem};
use serde::Serialize;
use std::fmt;

/// An open visiting order: the start (index 0) followed by every destination once.
///
/// Routes are values. Every transformation returns a new `Route` and leaves
/// the receiver untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Route {
    stops: Vec<usize>,
}

impl Route {
    /// The route of a request without destinations.
    pub fn start_only() -> Self {
        Route { stops: vec![0] }
    }

    /// Create a route from an explicit sequence, checking the permutation invariant.
    pub fn new(stops: Vec<usize>) -> Result<Self> {
        let n = stops.len().saturating_sub(1);
        let route = Route { stops };
        if !route.is_permutation_of(n) {
            return Err(Error::invalid_input(format!(
                "{route} is not a permutation of 0..={n} starting at 0"
            )));
        }
        Ok(route)
    }

    /// Ordered point indices, start first.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Number of stops including the start.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Number of destinations visited.
    pub fn destination_count(&self) -> usize {
        self.stops.len() - 1
    }

    /// Last visited index.
    pub fn last(&self) -> usize {
        self.stops[self.stops.len() - 1]
    }

    /// Check that this route starts at 0 and visits each of `1..=n` exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.stops.len() != n + 1 || self.stops.first() != Some(&0) {
            return false;
        }
        let mut seen = vec![false; n + 1];
        for &stop in &self.stops {
            if stop > n || seen[stop] {
                return false;
            }
            seen[stop] = true;
        }
        true
    }

    /// A new route with `index` visited last.
    pub fn appended(&self, index: usize) -> Route {
        let mut stops = Vec::with_capacity(self.stops.len() + 1);
        stops.extend_from_slice(&self.stops);
        stops.push(index);
        Route { stops }
    }

    /// A new route with `indices` visited last, in order.
    pub fn extended(&self, indices: &[usize]) -> Route {
        let mut stops = Vec::with_capacity(self.stops.len() + indices.len());
        stops.extend_from_slice(&self.stops);
        stops.extend_from_slice(indices);
        Route { stops }
    }

    /// A new route with `index` inserted at `position` (`1..=len`).
    pub fn inserted(&self, position: usize, index: usize) -> Route {
        debug_assert!(position >= 1 && position <= self.stops.len());
        let mut stops = Vec::with_capacity(self.stops.len() + 1);
        stops.extend_from_slice(&self.stops[..position]);
        stops.push(index);
        stops.extend_from_slice(&self.stops[position..]);
        Route { stops }
    }

    /// A new route with positions `i..=j` reversed (`1 <= i < j`).
    pub fn with_reversed(&self, i: usize, j: usize) -> Route {
        debug_assert!(i >= 1 && i < j && j < self.stops.len());
        let mut stops = self.stops.clone();
        stops[i..=j].reverse();
        Route { stops }
    }

    /// Open-path cost of this route under a matrix.
    pub fn cost(&self, matrix: &CostMatrix) -> f64 {
        matrix.path_cost(&self.stops)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, stop) in self.stops.iter().enumerate() {
            if k > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

/// A candidate route with its metrics, as offered to the caller.
#[derive(Clone, Serialize)]
pub struct RouteOption {
    pub name: String,
    pub description: String,
    pub route: Route,
    /// Open-path sum of distance-matrix entries along `route`
    pub total_distance: f64,
    /// Open-path sum of duration-matrix entries along `route`
    pub total_duration: f64,
}

impl RouteOption {
    /// Evaluate a route against both matrices of a problem.
    ///
    /// The route must visit every destination of `problem` exactly once.
    pub fn evaluate(
        name: impl Into<String>,
        description: impl Into<String>,
        route: Route,
        problem: &Problem,
    ) -> Result<Self> {
        let name = name.into();
        let n = problem.get_destination_count();
        if !route.is_permutation_of(n) {
            return Err(Error::invalid_input(format!(
                "option {name}: route {route} does not cover the {n} destinations"
            )));
        }

        let total_distance = route.cost(&problem.distances);
        let total_duration = route.cost(&problem.durations);
        Ok(RouteOption {
            name,
            description: description.into(),
            route,
            total_distance,
            total_duration,
        })
    }
}

impl fmt::Debug for RouteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Route option: {}", self.name)?;
        writeln!(f, "  {}", self.description)?;
        writeln!(f, "  Distance: {:.2}", self.total_distance)?;
        writeln!(f, "  Duration: {:.2}", self.total_duration)?;
        writeln!(f, "  Stops: {}", self.route.destination_count())?;
        writeln!(f, "  Route: {}", self.route)
    }
}
