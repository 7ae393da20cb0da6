//! Baseline ordering by distance from the start.

use crate::problem::CostMatrix;
use crate::solution::Route;

/// Visit destinations in ascending cost from the start; equal costs keep index order.
pub fn geographic_sort(matrix: &CostMatrix) -> Route {
    let n = matrix.size().saturating_sub(1);
    let mut order: Vec<usize> = (1..=n).collect();
    order.sort_by(|&a, &b| matrix.get(0, a).total_cmp(&matrix.get(0, b)));
    Route::start_only().extended(&order)
}
