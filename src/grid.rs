//! Capital grid and precomputed output.

use crate::calibration::{Calibration, SteadyState};
use crate::matrix::StateMatrix;

/// Evenly spaced, strictly increasing capital levels.
///
/// The index into the grid is the canonical representation of a capital
/// level everywhere in the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalGrid {
    points: Vec<f64>,
}

impl CapitalGrid {
    /// `points` values `lower + step * i`.
    pub fn new(lower: f64, step: f64, points: usize) -> Self {
        Self {
            points: (0..points).map(|i| lower + step * (i as f64)).collect(),
        }
    }

    /// The calibrated grid, anchored at a fraction of steady-state capital.
    pub fn from_calibration(calibration: &Calibration, steady_state: &SteadyState) -> Self {
        Self::new(
            calibration.grid_lower_fraction() * steady_state.capital,
            calibration.grid_step(),
            calibration.grid_points(),
        )
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.points.get(idx).copied()
    }
}

/// Output for every (capital, productivity) pair:
/// `productivity[p] * grid[k]^alpha`.
pub fn output_table(grid: &CapitalGrid, calibration: &Calibration) -> StateMatrix {
    let alpha = calibration.alpha();
    let productivity = calibration.productivity();
    StateMatrix::from_fn(grid.len(), productivity.len(), |k, p| {
        productivity[p] * grid.points[k].powf(alpha)
    })
}
