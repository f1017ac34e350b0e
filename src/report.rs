//! Console report of a solver run.

use std::io::{self, Write};

use crate::calibration::SteadyState;
use crate::solver::{Progress, Solution};

/// Progress is printed on the first iteration and every tenth.
pub fn should_report(iteration: usize) -> bool {
    iteration % 10 == 0 || iteration == 1
}

/// Writes the human-readable report lines.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn steady_state(&mut self, steady_state: &SteadyState) -> io::Result<()> {
        writeln!(
            self.out,
            "Output = {}, Capital = {}, Consumption = {}",
            steady_state.output, steady_state.capital, steady_state.consumption
        )
    }

    /// Prints the iteration line when [`should_report`] selects it.
    pub fn progress(&mut self, progress: &Progress) -> io::Result<()> {
        if should_report(progress.iteration) {
            writeln!(
                self.out,
                "Iteration = {}, Sup Diff = {}",
                progress.iteration, progress.sup_diff
            )?;
        }
        Ok(())
    }

    /// Final iteration line, plus a notice when the iteration cap was hit.
    pub fn finished(&mut self, solution: &Solution) -> io::Result<()> {
        writeln!(
            self.out,
            "Iteration = {}, Sup Diff = {}\n",
            solution.iterations(),
            solution.sup_diff()
        )?;
        if !solution.is_converged() {
            writeln!(
                self.out,
                "Did not converge after {} iterations\n",
                solution.iterations()
            )?;
        }
        Ok(())
    }

    pub fn check(&mut self, value: f64) -> io::Result<()> {
        writeln!(self.out, "My check = {}\n", value)
    }

    pub fn elapsed(&mut self, secs: f64) -> io::Result<()> {
        writeln!(self.out, "Elapsed time is = {}", secs)
    }

    /// One timed run of the sample mode (1-based).
    pub fn sample(&mut self, run: usize, secs: f64) -> io::Result<()> {
        writeln!(self.out, "Sample #{}, Time: {}s", run, secs)
    }

    pub fn median(&mut self, secs: f64) -> io::Result<()> {
        writeln!(self.out, "\nMedian time is = {}", secs)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::solver::Solver;

    fn text(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn reports_first_and_every_tenth() {
        let picked: Vec<usize> = (1..=35).filter(|&i| should_report(i)).collect();
        assert_eq!(picked, vec![1, 10, 20, 30]);
    }

    #[test]
    fn progress_lines() {
        let mut reporter = Reporter::new(Vec::new());
        for iteration in 1..=11 {
            reporter
                .progress(&Progress {
                    iteration,
                    sup_diff: 0.5,
                })
                .unwrap();
        }
        assert_eq!(
            text(reporter),
            "Iteration = 1, Sup Diff = 0.5\nIteration = 10, Sup Diff = 0.5\n"
        );
    }

    #[test]
    fn steady_state_line() {
        let mut reporter = Reporter::new(Vec::new());
        reporter
            .steady_state(&SteadyState {
                capital: 0.25,
                output: 0.5,
                consumption: 0.25,
            })
            .unwrap();
        assert_eq!(
            text(reporter),
            "Output = 0.5, Capital = 0.25, Consumption = 0.25\n"
        );
    }

    #[test]
    fn finished_flags_non_convergence() {
        let calibration = Calibration::benchmark()
            .with_grid(100, 0.002, 0.5)
            .with_max_iterations(2);
        let solution = Solver::new(calibration).unwrap().solve();

        let mut reporter = Reporter::new(Vec::new());
        reporter.finished(&solution).unwrap();
        let out = text(reporter);
        assert!(out.starts_with("Iteration = 2, Sup Diff = "));
        assert!(out.contains("Did not converge after 2 iterations"));
    }

    #[test]
    fn check_and_timing_lines() {
        let mut reporter = Reporter::new(Vec::new());
        reporter.check(0.125).unwrap();
        reporter.sample(1, 2.0).unwrap();
        reporter.median(1.5).unwrap();
        reporter.elapsed(3.25).unwrap();
        assert_eq!(
            text(reporter),
            "My check = 0.125\n\nSample #1, Time: 2s\n\nMedian time is = 1.5\nElapsed time is = 3.25\n"
        );
    }
}
