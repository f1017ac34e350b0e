//! Value function iteration with a monotone policy search.
//!
//! Each iteration computes the expected continuation value
//! `EV[k, p] = sum_p' T[p][p'] V[k, p']`, then maximizes the Bellman
//! right-hand side
//!
//! ```text
//! V'[k, p] = max_k' (1 - beta) ln(y[k, p] - k') + beta EV[k', p]
//! ```
//!
//! by a forward scan over `k'`. The optimal choice is non-decreasing in
//! current capital, so within one productivity row the scan for `k + 1`
//! resumes where the scan for `k` stopped, and it stops at the first
//! candidate that does not improve on the best so far. A whole row costs
//! about `O(n_capital)` evaluations instead of `O(n_capital^2)`.
//!
//! Productivity rows are independent in both steps. With more than one
//! thread they are handed to a scoped pool, one task per row; the results
//! are bit-identical to the sequential run.

use std::mem;

use scoped_threadpool::Pool;
use tracing::{debug, info, warn};

use crate::calibration::{
    Calibration, SteadyState, DIAGNOSTIC_CAPITAL, DIAGNOSTIC_PRODUCTIVITY,
};
use crate::error::RbcError;
use crate::grid::{output_table, CapitalGrid};
use crate::matrix::StateMatrix;

/// Snapshot handed to the progress callback after every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Sup-norm distance between this iterate and the previous one.
    pub sup_diff: f64,
}

/// How the iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The sup-norm distance fell to the tolerance.
    Converged,
    /// The iteration cap was reached first.
    IterationLimit,
}

/// Converged (or capped) value and policy functions.
#[derive(Debug, Clone)]
pub struct Solution {
    value: StateMatrix,
    policy: StateMatrix,
    iterations: usize,
    sup_diff: f64,
    status: Convergence,
}

impl Solution {
    /// Value function at the last iterate.
    pub fn value(&self) -> &StateMatrix {
        &self.value
    }

    /// Next-period capital level chosen in every state.
    pub fn policy(&self) -> &StateMatrix {
        &self.policy
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sup-norm distance of the final iteration.
    pub fn sup_diff(&self) -> f64 {
        self.sup_diff
    }

    pub fn status(&self) -> Convergence {
        self.status
    }

    pub fn is_converged(&self) -> bool {
        self.status == Convergence::Converged
    }

    /// The policy cell used as the regression check, if it lies on the grid.
    pub fn diagnostic(&self) -> Option<f64> {
        self.policy
            .try_get(DIAGNOSTIC_CAPITAL, DIAGNOSTIC_PRODUCTIVITY)
    }

    /// Whether the policy is weakly increasing in capital for every
    /// productivity state.
    pub fn is_policy_monotone(&self) -> bool {
        self.policy
            .rows()
            .all(|row| row.windows(2).all(|w| w[0] <= w[1]))
    }
}

/// Value function iteration over a fixed capital grid.
///
/// # Example
///
/// ```
/// use rbc::{Calibration, Solver};
///
/// let calibration = Calibration::benchmark().with_grid(200, 0.001, 0.5);
/// let mut solver = Solver::new(calibration).unwrap();
/// let solution = solver.solve();
/// assert!(solution.is_converged());
/// assert!(solution.is_policy_monotone());
/// ```
pub struct Solver {
    calibration: Calibration,
    steady_state: SteadyState,
    grid: CapitalGrid,
    output: StateMatrix,
    pool: Option<Pool>,
}

impl Solver {
    /// Validates the calibration and precomputes the grid and output table.
    ///
    /// The solver starts out sequential; see [`with_threads`](Self::with_threads).
    pub fn new(calibration: Calibration) -> Result<Self, RbcError> {
        calibration.validate()?;

        let steady_state = calibration.steady_state();
        let grid = CapitalGrid::from_calibration(&calibration, &steady_state);
        let output = output_table(&grid, &calibration);
        debug!(
            n_capital = grid.len(),
            n_productivity = calibration.n_productivity(),
            capital_steady_state = steady_state.capital,
            "built capital grid and output table"
        );

        Ok(Self {
            calibration,
            steady_state,
            grid,
            output,
            pool: None,
        })
    }

    /// Runs both steps on a pool of `threads` workers. One or zero threads
    /// keeps everything on the calling thread.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.pool = if threads > 1 {
            Some(Pool::new(u32::try_from(threads).unwrap_or(u32::MAX)))
        } else {
            None
        };
        self
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn steady_state(&self) -> SteadyState {
        self.steady_state
    }

    pub fn grid(&self) -> &CapitalGrid {
        &self.grid
    }

    pub fn output(&self) -> &StateMatrix {
        &self.output
    }

    /// Iterates to convergence without progress reporting.
    pub fn solve(&mut self) -> Solution {
        self.solve_with(|_| {})
    }

    /// Iterates to convergence, calling `on_progress` after every iteration.
    pub fn solve_with<F>(&mut self, mut on_progress: F) -> Solution
    where
        F: FnMut(&Progress),
    {
        let Solver {
            ref calibration,
            ref grid,
            ref output,
            ref mut pool,
            ..
        } = *self;
        let n_capital = grid.len();
        let n_productivity = calibration.n_productivity();
        let beta = calibration.beta();
        let tolerance = calibration.tolerance();
        let max_iterations = calibration.max_iterations();
        let grid = grid.as_slice();

        // Required matrices and vectors
        let mut value = StateMatrix::zeros(n_capital, n_productivity);
        let mut value_next = StateMatrix::zeros(n_capital, n_productivity);
        let mut policy = StateMatrix::zeros(n_capital, n_productivity);
        let mut expected = StateMatrix::zeros(n_capital, n_productivity);

        // small array to split where the writes are going, so we don't need a mutex
        let mut diffs = vec![0f64; n_productivity];

        let mut iteration = 0;
        loop {
            match pool.as_mut() {
                Some(pool) => {
                    pool.scoped(|scoped| {
                        for (expected_row, transitions) in
                            expected.rows_mut().zip(calibration.transition_rows())
                        {
                            // Only capture refs
                            let value = &value;
                            scoped.execute(move || expectation_row(transitions, value, expected_row));
                        }
                    });

                    pool.scoped(|scoped| {
                        for (((((value_next_row, policy_row), max_diff), expected_row), output_row), value_row) in
                            value_next
                                .rows_mut()
                                .zip(policy.rows_mut())
                                .zip(diffs.iter_mut())
                                .zip(expected.rows())
                                .zip(output.rows())
                                .zip(value.rows())
                        {
                            scoped.execute(move || {
                                *max_diff = maximize_row(
                                    beta,
                                    grid,
                                    RowInputs {
                                        output: output_row,
                                        expected: expected_row,
                                        value: value_row,
                                    },
                                    value_next_row,
                                    policy_row,
                                );
                            });
                        }
                    });
                }
                None => {
                    for (expected_row, transitions) in
                        expected.rows_mut().zip(calibration.transition_rows())
                    {
                        expectation_row(transitions, &value, expected_row);
                    }

                    for (((((value_next_row, policy_row), max_diff), expected_row), output_row), value_row) in
                        value_next
                            .rows_mut()
                            .zip(policy.rows_mut())
                            .zip(diffs.iter_mut())
                            .zip(expected.rows())
                            .zip(output.rows())
                            .zip(value.rows())
                    {
                        *max_diff = maximize_row(
                            beta,
                            grid,
                            RowInputs {
                                output: output_row,
                                expected: expected_row,
                                value: value_row,
                            },
                            value_next_row,
                            policy_row,
                        );
                    }
                }
            }

            let sup_diff = diffs.iter().fold(0f64, |acc, &d| acc.max(d));
            // Every cell of value_next was written this iteration.
            mem::swap(&mut value, &mut value_next);

            iteration += 1;
            debug!(iteration, sup_diff, "bellman iteration");
            on_progress(&Progress {
                iteration,
                sup_diff,
            });

            let status = if sup_diff <= tolerance {
                info!(iteration, sup_diff, "value function converged");
                Some(Convergence::Converged)
            } else if iteration >= max_iterations {
                warn!(
                    iteration,
                    sup_diff, tolerance, "iteration limit reached before convergence"
                );
                Some(Convergence::IterationLimit)
            } else {
                None
            };

            if let Some(status) = status {
                return Solution {
                    value,
                    policy,
                    iterations: iteration,
                    sup_diff,
                    status,
                };
            }
        }
    }
}

/// Read-only slices for one productivity row of the maximization step.
#[derive(Clone, Copy)]
pub(crate) struct RowInputs<'a> {
    pub output: &'a [f64],
    pub expected: &'a [f64],
    pub value: &'a [f64],
}

/// Bellman objective for one candidate. Infeasible consumption can never win.
#[inline]
pub(crate) fn bellman_value(beta: f64, consumption: f64, expected: f64) -> f64 {
    if consumption <= 0.0 {
        return f64::NEG_INFINITY;
    }
    (1.0 - beta) * (consumption.ln()) + beta * expected
}

/// Fills one productivity row of the expected value function.
pub(crate) fn expectation_row(transitions: &[f64], value: &StateMatrix, expected: &mut [f64]) {
    for (idx, expected_value) in expected.iter_mut().enumerate() {
        *expected_value = transitions
            .iter()
            .enumerate()
            .fold(0.0f64, |acc, (next, transition)| {
                acc + (transition * value.get(idx, next))
            });
    }
}

/// Maximizes the Bellman right-hand side for every capital level of one
/// productivity row and returns the row's sup-norm change.
///
/// The cursor starts at the lowest grid point and only moves forward. Every
/// cell of `value_next` and `policy` is written: the candidate at the cursor
/// was affordable at a lower capital level, so it is affordable here too and
/// the first comparison always succeeds.
pub(crate) fn maximize_row(
    beta: f64,
    grid: &[f64],
    row: RowInputs<'_>,
    value_next: &mut [f64],
    policy: &mut [f64],
) -> f64 {
    let mut max_diff = 0f64;

    // We start from previous choice (monotonicity of policy function)
    let mut grid_capital_next_period = 0;

    for (idx, ((value_new, policy_choice), &output)) in value_next
        .iter_mut()
        .zip(policy.iter_mut())
        .zip(row.output)
        .enumerate()
    {
        let mut value_high = f64::NEG_INFINITY;
        let mut choice = grid_capital_next_period;

        for capital_next_period in grid_capital_next_period..grid.len() {
            let value_provisional = bellman_value(
                beta,
                output - grid[capital_next_period],
                row.expected[capital_next_period],
            );

            if value_provisional > value_high {
                value_high = value_provisional;
                choice = capital_next_period;
            } else {
                break; // We break when we have achieved the max
            }
        }
        debug_assert!(value_high.is_finite(), "no feasible choice at capital {idx}");

        grid_capital_next_period = choice;
        *value_new = value_high;
        *policy_choice = grid[choice];
        max_diff = max_diff.max((row.value[idx] - value_high).abs());
    }

    max_diff
}
