//! Model calibration and the deterministic steady state.
//!
//! The benchmark calibration reproduces the classic comparison exercise:
//! full depreciation, log utility scaled by `1 - beta`, and a five-state
//! productivity chain.

use crate::error::RbcError;

// 1. Calibration
/// Elasticity of output w.r.t. capital.
pub const ALPHA: f64 = 0.33333333333;
/// Discount factor.
pub const BETA: f64 = 0.95;

/// Productivity values.
pub const PRODUCTIVITY: [f64; GRID_PRODUCTIVITY] = [0.9792, 0.9896, 1.0000, 1.0106, 1.0212];

/// Transition matrix.
pub const TRANSITIONS: [[f64; GRID_PRODUCTIVITY]; GRID_PRODUCTIVITY] = [
    [0.9727, 0.0273, 0.0000, 0.0000, 0.0000],
    [0.0041, 0.9806, 0.0153, 0.0000, 0.0000],
    [0.0000, 0.0082, 0.9837, 0.0082, 0.0000],
    [0.0000, 0.0000, 0.0153, 0.9806, 0.0041],
    [0.0000, 0.0000, 0.0000, 0.0273, 0.9727],
];

// Dimensions to generate the grid of capital
pub const GRID_CAPITAL: usize = 17820;
pub const GRID_PRODUCTIVITY: usize = 5;
pub const GRID_STEP: f64 = 0.00001;
/// The grid starts at this fraction of steady-state capital.
pub const GRID_LOWER_FRACTION: f64 = 0.5;

/// Sup-norm distance at which iteration stops.
pub const TOLERANCE: f64 = 0.0000001;
/// Iteration cap; the benchmark converges in a few hundred.
pub const MAX_ITERATIONS: usize = 10_000;

/// Policy cell printed as the regression check.
pub const DIAGNOSTIC_CAPITAL: usize = 999;
pub const DIAGNOSTIC_PRODUCTIVITY: usize = 2;
/// Value of the diagnostic cell for the benchmark calibration.
pub const REFERENCE_CHECK: f64 = 0.1465491436956954;

/// Allowed deviation of a transition row sum from one.
///
/// The published chain is rounded to four decimals and its middle row sums
/// to 1.0001; the entries stay as published because the reference check
/// depends on them.
pub const ROW_SUM_TOLERANCE: f64 = 1e-3;

/// Deterministic steady state of the model without productivity shocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyState {
    /// Steady-state capital `k* = (alpha * beta)^(1 / (1 - alpha))`.
    pub capital: f64,
    /// Steady-state output `y* = k*^alpha`.
    pub output: f64,
    /// Steady-state consumption `c* = y* - k*`.
    pub consumption: f64,
}

/// Structural parameters, productivity process and grid layout.
///
/// Immutable once handed to the solver. Use [`Calibration::benchmark`] for
/// the reference model and the builder methods to derive variants.
///
/// # Example
///
/// ```
/// use rbc::Calibration;
///
/// let calibration = Calibration::benchmark().with_grid(500, 0.0005, 0.5);
/// assert!(calibration.validate().is_ok());
/// assert_eq!(calibration.grid_points(), 500);
/// ```
#[derive(Debug, Clone)]
pub struct Calibration {
    alpha: f64,
    beta: f64,
    productivity: Vec<f64>,
    /// Row-major `n x n` transition probabilities.
    transitions: Vec<f64>,
    transition_rows: usize,
    transition_cols: usize,
    grid_points: usize,
    grid_step: f64,
    grid_lower_fraction: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl Calibration {
    /// The reference calibration.
    pub fn benchmark() -> Self {
        Self {
            alpha: ALPHA,
            beta: BETA,
            productivity: PRODUCTIVITY.to_vec(),
            transitions: TRANSITIONS.iter().flatten().copied().collect(),
            transition_rows: GRID_PRODUCTIVITY,
            transition_cols: GRID_PRODUCTIVITY,
            grid_points: GRID_CAPITAL,
            grid_step: GRID_STEP,
            grid_lower_fraction: GRID_LOWER_FRACTION,
            tolerance: TOLERANCE,
            max_iterations: MAX_ITERATIONS,
        }
    }

    /// Sets the capital elasticity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the discount factor.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Replaces the productivity process.
    ///
    /// `transitions[i][j]` is the probability of moving from state `i` to
    /// state `j`. Shape and stochasticity are checked by [`validate`](Self::validate).
    pub fn with_productivity(mut self, levels: Vec<f64>, transitions: Vec<Vec<f64>>) -> Self {
        self.transition_rows = transitions.len();
        self.transition_cols = transitions
            .iter()
            .map(Vec::len)
            .find(|&len| len != levels.len())
            .unwrap_or(levels.len());
        self.transitions = transitions.into_iter().flatten().collect();
        self.productivity = levels;
        self
    }

    /// Sets the capital grid: `points` values starting at
    /// `lower_fraction * k*` spaced `step` apart.
    pub fn with_grid(mut self, points: usize, step: f64, lower_fraction: f64) -> Self {
        self.grid_points = points;
        self.grid_step = step;
        self.grid_lower_fraction = lower_fraction;
        self
    }

    /// Sets the sup-norm convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    // --- Accessors ---

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Productivity levels, one per state.
    pub fn productivity(&self) -> &[f64] {
        &self.productivity
    }

    /// Number of productivity states.
    pub fn n_productivity(&self) -> usize {
        self.productivity.len()
    }

    /// Transition probabilities out of state `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not a valid state index.
    pub fn transition_row(&self, from: usize) -> &[f64] {
        let n = self.n_productivity();
        &self.transitions[from * n..(from + 1) * n]
    }

    /// Iterates the transition rows in state order.
    pub fn transition_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.transitions.chunks_exact(self.n_productivity().max(1))
    }

    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    pub fn grid_lower_fraction(&self) -> f64 {
        self.grid_lower_fraction
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Closed-form deterministic steady state.
    pub fn steady_state(&self) -> SteadyState {
        // 2. Steady State
        let capital = (self.alpha * self.beta).powf(1_f64 / (1_f64 - self.alpha));
        let output = capital.powf(self.alpha);
        SteadyState {
            capital,
            output,
            consumption: output - capital,
        }
    }

    /// Validates this calibration.
    ///
    /// Checks that `alpha` and `beta` lie in `(0, 1)`, that productivity
    /// levels are positive, that the transition matrix is square and
    /// row-stochastic, that the grid is non-empty with a positive step and
    /// lower bound, and that every state can afford at least the lowest grid
    /// point. The last condition guarantees the Bellman search writes every
    /// cell on every iteration.
    pub fn validate(&self) -> Result<(), RbcError> {
        Self::validate_unit("alpha", self.alpha)?;
        Self::validate_unit("beta", self.beta)?;

        if self.productivity.is_empty() {
            return Err(RbcError::EmptyProductivity);
        }
        for (index, &value) in self.productivity.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(RbcError::InvalidProductivity { index, value });
            }
        }
        self.validate_transitions()?;

        if self.grid_points == 0 {
            return Err(RbcError::InvalidGrid {
                reason: "grid must have at least one point".to_string(),
            });
        }
        if !self.grid_step.is_finite() || self.grid_step <= 0.0 {
            return Err(RbcError::InvalidGrid {
                reason: format!("step must be finite and positive, got {}", self.grid_step),
            });
        }
        if !self.grid_lower_fraction.is_finite() || self.grid_lower_fraction <= 0.0 {
            return Err(RbcError::InvalidGrid {
                reason: format!(
                    "lower fraction must be finite and positive, got {}",
                    self.grid_lower_fraction
                ),
            });
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(RbcError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(RbcError::ZeroIterations);
        }

        // Output rises with capital and the search cursor never moves past an
        // accepted choice, so the lowest state is the only one that can fail.
        let lowest = self.grid_lower_fraction * self.steady_state().capital;
        for &productivity in &self.productivity {
            let output = productivity * lowest.powf(self.alpha);
            if output <= lowest {
                return Err(RbcError::Infeasible {
                    capital: lowest,
                    productivity,
                    output,
                });
            }
        }

        Ok(())
    }

    fn validate_unit(name: &'static str, value: f64) -> Result<(), RbcError> {
        if !value.is_finite() || value <= 0.0 || value >= 1.0 {
            return Err(RbcError::InvalidParameter { name, value });
        }
        Ok(())
    }

    fn validate_transitions(&self) -> Result<(), RbcError> {
        let n = self.n_productivity();
        if self.transition_rows != n || self.transition_cols != n || self.transitions.len() != n * n
        {
            return Err(RbcError::TransitionShape {
                expected: n,
                rows: self.transition_rows,
                cols: self.transition_cols,
            });
        }
        for (row, probs) in self.transition_rows().enumerate() {
            let mut sum = 0.0;
            for (col, &p) in probs.iter().enumerate() {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(RbcError::NotStochastic {
                        row,
                        reason: format!("entry {col} = {p} is outside [0, 1]"),
                    });
                }
                sum += p;
            }
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(RbcError::NotStochastic {
                    row,
                    reason: format!("sums to {sum}, expected 1"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::benchmark()
    }
}
