//! Problem definition: start location, destinations and travel cost matrices.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::invalid_input(format!("latitude {lat} out of range")));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::invalid_input(format!("longitude {lng} out of range")));
        }
        Ok(Coordinate { lat, lng })
    }

    /// Parse `"lat,lng"` text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(',').map(str::trim);
        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::invalid_input(format!(
                "expected `lat,lng`, got `{text}`"
            )));
        };
        let lat = lat
            .parse::<f64>()
            .map_err(|e| Error::invalid_input(format!("latitude `{lat}`: {e}")))?;
        let lng = lng
            .parse::<f64>()
            .map_err(|e| Error::invalid_input(format!("longitude `{lng}`: {e}")))?;
        Coordinate::checked(lat, lng)
    }

    /// Great-circle distance in metres.
    pub fn haversine_distance(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// A destination to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub coordinate: Coordinate,
    pub name: Option<String>,
}

impl Point {
    /// Create a new point.
    pub fn new(id: impl Into<String>, lat: f64, lng: f64, name: Option<String>) -> Self {
        Point {
            id: id.into(),
            coordinate: Coordinate::new(lat, lng),
            name,
        }
    }

    /// Display name, `N/A` when absent.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }
}

/// A complete, validated square matrix of nonnegative travel costs.
///
/// Row-major; index 0 is the start location. Asymmetric values are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    size: usize,
}

impl CostMatrix {
    /// Validate provider rows, where `None` marks a missing entry.
    ///
    /// Fails with [`Error::MatrixIncomplete`] unless the rows form a
    /// `size`×`size` matrix of finite nonnegative values with a zero diagonal.
    pub fn from_rows(matrix: &'static str, rows: &[Vec<Option<f64>>], size: usize) -> Result<Self> {
        if rows.len() != size {
            return Err(Error::matrix_incomplete(
                matrix,
                format!("expected {size} rows, got {}", rows.len()),
            ));
        }

        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::matrix_incomplete(
                    matrix,
                    format!("row {i} has {} entries, expected {size}", row.len()),
                ));
            }
            for (j, entry) in row.iter().enumerate() {
                let value = entry.ok_or_else(|| {
                    Error::matrix_incomplete(matrix, format!("missing entry ({i}, {j})"))
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(Error::matrix_incomplete(
                        matrix,
                        format!("entry ({i}, {j}) is {value}"),
                    ));
                }
                if i == j && value != 0.0 {
                    return Err(Error::matrix_incomplete(
                        matrix,
                        format!("diagonal entry ({i}, {i}) is {value}"),
                    ));
                }
                data.push(value);
            }
        }

        Ok(CostMatrix { data, size })
    }

    /// Validate fully populated rows.
    pub fn from_complete(matrix: &'static str, rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let rows: Vec<Vec<Option<f64>>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        Self::from_rows(matrix, &rows, size)
    }

    /// Cost of travelling from `from` to `to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Larger of the two directed costs between `a` and `b`.
    pub fn mutual(&self, a: usize, b: usize) -> f64 {
        self.get(a, b).max(self.get(b, a))
    }

    /// Number of points covered, start included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of consecutive entries along an open path.
    pub fn path_cost(&self, stops: &[usize]) -> f64 {
        stops.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// One planning request: a start, its destinations and the travel matrices.
///
/// Index 0 is the start; destination `k` (0-based in `destinations`) has
/// index `k + 1` in both matrices and in every route.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub start: Coordinate,
    pub destinations: Vec<Point>,
    pub distances: CostMatrix,
    pub durations: CostMatrix,
}

impl Problem {
    /// Create a problem, checking that both matrices cover start + destinations.
    pub fn new(
        name: impl Into<String>,
        start: Coordinate,
        destinations: Vec<Point>,
        distances: CostMatrix,
        durations: CostMatrix,
    ) -> Result<Self> {
        let expected = destinations.len() + 1;
        if distances.size() != expected {
            return Err(Error::matrix_incomplete(
                "distance",
                format!("covers {} points, expected {expected}", distances.size()),
            ));
        }
        if durations.size() != expected {
            return Err(Error::matrix_incomplete(
                "duration",
                format!("covers {} points, expected {expected}", durations.size()),
            ));
        }

        Ok(Problem {
            name: name.into(),
            start,
            destinations,
            distances,
            durations,
        })
    }

    /// Travel distance between two route indices.
    pub fn get_distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Travel duration between two route indices.
    pub fn get_duration(&self, from: usize, to: usize) -> f64 {
        self.durations.get(from, to)
    }

    /// Number of destinations (excluding the start).
    pub fn get_destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Coordinate of a route index.
    pub fn coordinate(&self, index: usize) -> Coordinate {
        if index == 0 {
            self.start
        } else {
            self.destinations[index - 1].coordinate
        }
    }

    /// Destination behind a route index; `None` for the start.
    pub fn destination(&self, index: usize) -> Option<&Point> {
        index.checked_sub(1).and_then(|k| self.destinations.get(k))
    }
}
