//! Travel cost and route geometry providers.
//!
//! The optimizer never computes road costs itself. A [`CostMatrixProvider`]
//! supplies them for `start + destinations`, in that order; a
//! [`GeometryProvider`] turns an ordered coordinate list into a display
//! polyline.

use crate::error::{Error, Result};
use crate::problem::Coordinate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Raw distance and duration matrices as returned by a provider.
///
/// `None` marks an entry the provider could not compute. Validation happens
/// when the matrices are turned into a [`crate::problem::Problem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelMatrices {
    pub distances: Vec<Vec<Option<f64>>>,
    pub durations: Vec<Vec<Option<f64>>>,
}

impl TravelMatrices {
    /// Matrices without missing entries.
    pub fn complete(distances: Vec<Vec<f64>>, durations: Vec<Vec<f64>>) -> Self {
        let wrap = |rows: Vec<Vec<f64>>| -> Vec<Vec<Option<f64>>> {
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect()
        };
        TravelMatrices {
            distances: wrap(distances),
            durations: wrap(durations),
        }
    }
}

/// Source of pairwise travel costs.
pub trait CostMatrixProvider {
    /// Matrices for `coordinates`; index 0 is the start.
    ///
    /// Transport, authentication or provider failures are reported as
    /// [`Error::ProviderUnavailable`] and are not retried.
    fn fetch(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices>;
}

/// Source of display geometry for an ordered route.
pub trait GeometryProvider {
    fn geometry(&self, coordinates: &[Coordinate]) -> Result<Vec<Coordinate>>;
}

/// Fixed matrices answer any request of the matching size.
impl CostMatrixProvider for TravelMatrices {
    fn fetch(&self, _coordinates: &[Coordinate]) -> Result<TravelMatrices> {
        Ok(self.clone())
    }
}

/// Estimates costs from great-circle distance and a constant speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineProvider {
    /// Travel speed in metres per second
    pub speed_mps: f64,
}

impl StraightLineProvider {
    pub fn new(speed_mps: f64) -> Self {
        StraightLineProvider { speed_mps }
    }
}

impl Default for StraightLineProvider {
    fn default() -> Self {
        // 30 km/h
        StraightLineProvider::new(30.0 / 3.6)
    }
}

impl CostMatrixProvider for StraightLineProvider {
    fn fetch(&self, coordinates: &[Coordinate]) -> Result<TravelMatrices> {
        if !(self.speed_mps.is_finite() && self.speed_mps > 0.0) {
            return Err(Error::provider_unavailable(format!(
                "invalid straight-line speed {} m/s",
                self.speed_mps
            )));
        }

        let distances: Vec<Vec<f64>> = coordinates
            .iter()
            .map(|from| {
                coordinates
                    .iter()
                    .map(|to| from.haversine_distance(to))
                    .collect()
            })
            .collect();
        let durations = distances
            .iter()
            .map(|row| row.iter().map(|d| d / self.speed_mps).collect())
            .collect();

        Ok(TravelMatrices::complete(distances, durations))
    }
}

/// Reads precomputed matrices from a JSON document
/// `{"distances": [[...]], "durations": [[...]]}`, `null` for missing entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonMatrixProvider {
    path: PathBuf,
}

impl JsonMatrixProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonMatrixProvider {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CostMatrixProvider for JsonMatrixProvider {
    fn fetch(&self, _coordinates: &[Coordinate]) -> Result<TravelMatrices> {
        let file = File::open(&self.path).map_err(|e| {
            Error::provider_unavailable(format!("{}: {e}", self.path.display()))
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::provider_unavailable(format!("{}: {e}", self.path.display())))
    }
}

/// Draws straight segments between consecutive stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StraightLineGeometry;

impl GeometryProvider for StraightLineGeometry {
    fn geometry(&self, coordinates: &[Coordinate]) -> Result<Vec<Coordinate>> {
        Ok(coordinates.to_vec())
    }
}
