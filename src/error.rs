//! Error types for the rbc crate.

/// Error type for calibrations the solver refuses to run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RbcError {
    /// Returned when a structural parameter lies outside its admissible range.
    #[error("invalid parameter {name}: {value} (must be in (0, 1))")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when there are no productivity states.
    #[error("productivity process has no states")]
    EmptyProductivity,

    /// Returned when a productivity level is non-finite or non-positive.
    #[error("invalid productivity level {index}: {value} (must be finite and > 0)")]
    InvalidProductivity {
        /// Index of the productivity state.
        index: usize,
        /// The rejected level.
        value: f64,
    },

    /// Returned when the transition matrix is not `n x n` for `n` productivity states.
    #[error("transition matrix shape mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    TransitionShape {
        /// Number of productivity states.
        expected: usize,
        /// Number of rows supplied.
        rows: usize,
        /// Length of the offending (or first) row.
        cols: usize,
    },

    /// Returned when a transition row is not a probability distribution.
    #[error("transition row {row} is not stochastic: {reason}")]
    NotStochastic {
        /// Offending row.
        row: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the capital grid layout is unusable.
    #[error("invalid capital grid: {reason}")]
    InvalidGrid {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the lowest capital state cannot afford the lowest grid point.
    #[error(
        "no feasible choice at capital {capital} with productivity {productivity}: \
         output {output} does not exceed the grid lower bound"
    )]
    Infeasible {
        /// Lowest capital level on the grid.
        capital: f64,
        /// Productivity level of the infeasible state.
        productivity: f64,
        /// Output produced in that state.
        output: f64,
    },

    /// Returned when the convergence tolerance is non-finite or non-positive.
    #[error("invalid tolerance: {0} (must be finite and > 0)")]
    InvalidTolerance(f64),

    /// Returned when the iteration cap is zero.
    #[error("maximum iteration count must be at least 1")]
    ZeroIterations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_parameter() {
        let e = RbcError::InvalidParameter {
            name: "alpha",
            value: 1.5,
        };
        assert_eq!(e.to_string(), "invalid parameter alpha: 1.5 (must be in (0, 1))");
    }

    #[test]
    fn error_transition_shape() {
        let e = RbcError::TransitionShape {
            expected: 5,
            rows: 4,
            cols: 5,
        };
        assert_eq!(
            e.to_string(),
            "transition matrix shape mismatch: expected 5x5, got 4x5"
        );
    }

    #[test]
    fn error_not_stochastic() {
        let e = RbcError::NotStochastic {
            row: 2,
            reason: "sums to 0.9".to_string(),
        };
        assert_eq!(e.to_string(), "transition row 2 is not stochastic: sums to 0.9");
    }

    #[test]
    fn error_infeasible() {
        let e = RbcError::Infeasible {
            capital: 2.0,
            productivity: 1.0,
            output: 1.25,
        };
        assert_eq!(
            e.to_string(),
            "no feasible choice at capital 2 with productivity 1: \
             output 1.25 does not exceed the grid lower bound"
        );
    }

    #[test]
    fn error_zero_iterations() {
        assert_eq!(
            RbcError::ZeroIterations.to_string(),
            "maximum iteration count must be at least 1"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<RbcError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<RbcError>();
    }
}
