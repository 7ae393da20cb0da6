//! Ranking and selection of route options.

use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::solution::{Route, RouteOption};
use serde::Serialize;

/// Route options sorted ascending by total distance.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RankedOptions {
    options: Vec<RouteOption>,
}

impl RankedOptions {
    /// Sort already evaluated options; equal distances keep their input order.
    pub fn rank(mut options: Vec<RouteOption>) -> Self {
        options.sort_by(|a, b| a.total_distance.total_cmp(&b.total_distance));
        RankedOptions { options }
    }

    /// Evaluate `(name, description, route)` candidates against `problem` and rank them.
    ///
    /// Fails if any candidate does not cover exactly the problem's destinations.
    pub fn evaluate<I, N, D>(candidates: I, problem: &Problem) -> Result<Self>
    where
        I: IntoIterator<Item = (N, D, Route)>,
        N: Into<String>,
        D: Into<String>,
    {
        let options = candidates
            .into_iter()
            .map(|(name, description, route)| RouteOption::evaluate(name, description, route, problem))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::rank(options))
    }

    pub fn options(&self) -> &[RouteOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The shortest option.
    pub fn best(&self) -> Option<&RouteOption> {
        self.options.first()
    }

    /// The option at `index` in ranked order.
    pub fn get(&self, index: usize) -> Result<&RouteOption> {
        self.options.get(index).ok_or_else(|| {
            Error::invalid_input(format!(
                "option {index} requested, {} available",
                self.options.len()
            ))
        })
    }

    pub fn into_vec(self) -> Vec<RouteOption> {
        self.options
    }
}
