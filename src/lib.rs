//! Basic RBC model with full depreciation, solved by value function iteration.
//!
//! # Pipeline
//!
//! ```text
//!  calibration ──▶ steady state ──▶ capital grid ──▶ output table ──▶ solver ──▶ report
//! ```
//!
//! The household maximizes `(1 - beta) ln(c) + beta E[V(k', z')]` subject to
//! `c + k' = z k^alpha`, with `z` following a five-state Markov chain. The
//! solver iterates the Bellman operator on a fixed grid of 17,820 capital
//! levels until the sup-norm distance between iterates drops to `1e-7`.
//!
//! # Quick start
//!
//! ```rust
//! use rbc::{Calibration, Solver};
//!
//! // A coarser grid than the benchmark keeps the example fast.
//! let calibration = Calibration::benchmark().with_grid(400, 0.0005, 0.5);
//! let mut solver = Solver::new(calibration).unwrap();
//! let solution = solver.solve();
//!
//! assert!(solution.is_converged());
//! ```

pub mod calibration;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod report;
pub mod solver;
pub mod timer;

pub use calibration::{Calibration, SteadyState};
pub use error::RbcError;
pub use grid::{output_table, CapitalGrid};
pub use matrix::StateMatrix;
pub use report::Reporter;
pub use solver::{Convergence, Progress, Solution, Solver};
pub use timer::{Clock, PreciseClock, Stopwatch};
