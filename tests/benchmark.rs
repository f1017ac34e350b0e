//! End-to-end run of the benchmark calibration.

use rbc::calibration::{
    DIAGNOSTIC_CAPITAL, DIAGNOSTIC_PRODUCTIVITY, GRID_CAPITAL, GRID_PRODUCTIVITY,
    REFERENCE_CHECK, TOLERANCE,
};
use rbc::{Calibration, Progress, Solver};

#[test]
fn benchmark_converges_to_reference_policy() {
    let mut solver = Solver::new(Calibration::benchmark())
        .expect("benchmark calibration is valid")
        .with_threads(4);

    let ss = solver.steady_state();
    let capital = (0.33333333333_f64 * 0.95).powf(1.0 / (1.0 - 0.33333333333));
    assert_eq!(ss.capital, capital);
    assert_eq!(ss.output, capital.powf(0.33333333333));
    assert_eq!(ss.consumption, ss.output - ss.capital);

    let mut trace: Vec<Progress> = Vec::new();
    let solution = solver.solve_with(|p| trace.push(*p));

    assert!(solution.is_converged(), "stopped at {}", solution.sup_diff());
    assert!(solution.sup_diff() <= TOLERANCE);
    assert_eq!(solution.policy().n_capital(), GRID_CAPITAL);
    assert_eq!(solution.policy().n_productivity(), GRID_PRODUCTIVITY);

    // Regression check against the reference run.
    assert_eq!(solution.diagnostic(), Some(REFERENCE_CHECK));
    assert_eq!(
        solution
            .policy()
            .get(DIAGNOSTIC_CAPITAL, DIAGNOSTIC_PRODUCTIVITY),
        REFERENCE_CHECK
    );

    assert!(solution.is_policy_monotone());
    assert!(solution.value().as_slice().iter().all(|v| v.is_finite()));

    // The distance between iterates never grows once past the first steps.
    assert!(trace.iter().all(|p| p.sup_diff >= 0.0));
    assert_eq!(trace.len(), solution.iterations());
    let burn_in = 5;
    let increases: Vec<usize> = trace[burn_in..]
        .windows(2)
        .filter(|w| w[1].sup_diff > w[0].sup_diff)
        .map(|w| w[1].iteration)
        .collect();
    assert!(increases.is_empty(), "sup diff grew at iterations {increases:?}");
}

#[test]
fn benchmark_policy_stays_inside_grid() {
    let mut solver = Solver::new(Calibration::benchmark().with_max_iterations(25))
        .unwrap()
        .with_threads(4);
    let solution = solver.solve();
    let grid = solver.grid();
    let lo = grid.get(0).unwrap();
    let hi = grid.get(grid.len() - 1).unwrap();

    assert!(solution
        .policy()
        .as_slice()
        .iter()
        .all(|&c| (lo..=hi).contains(&c)));
    assert!(solution.is_policy_monotone());
}
