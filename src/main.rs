mod cli;
mod logging;

use std::io;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use rbc::calibration::REFERENCE_CHECK;
use rbc::{Calibration, Reporter, Solver, Stopwatch};

use crate::cli::Cli;

const SAMPLE_RUNS: usize = 5;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let calibration = Calibration::benchmark().with_max_iterations(cli.max_iterations);
    let threads = cli.threads.unwrap_or_else(num_cpus::get);
    info!(threads, "solver threads");

    if cli.sample {
        sample(&calibration, threads)
    } else {
        solve_once(calibration, threads)
    }
}

fn solve_once(calibration: Calibration, threads: usize) -> Result<()> {
    let cpu0 = Stopwatch::start();
    let mut reporter = Reporter::new(io::stdout().lock());

    let mut solver = Solver::new(calibration)
        .context("invalid calibration")?
        .with_threads(threads);
    reporter.steady_state(&solver.steady_state())?;

    let mut write_error = None;
    let solution = solver.solve_with(|progress| {
        if let Err(e) = reporter.progress(progress) {
            write_error.get_or_insert(e);
        }
    });
    if let Some(e) = write_error {
        return Err(anyhow::Error::new(e).context("failed to write progress"));
    }

    reporter.finished(&solution)?;
    if !solution.is_converged() {
        bail!(
            "value function iteration did not converge after {} iterations (sup diff {})",
            solution.iterations(),
            solution.sup_diff()
        );
    }

    let check = solution
        .diagnostic()
        .context("diagnostic policy cell lies outside the capital grid")?;
    reporter.check(check)?;
    if check != REFERENCE_CHECK {
        warn!(check, reference = REFERENCE_CHECK, "policy check differs from reference run");
    }

    reporter.elapsed(cpu0.elapsed_secs())?;
    Ok(())
}

fn sample(calibration: &Calibration, threads: usize) -> Result<()> {
    let mut reporter = Reporter::new(io::stdout().lock());

    let mut samples = Vec::with_capacity(SAMPLE_RUNS);
    for i in 0..SAMPLE_RUNS {
        let cpu0 = Stopwatch::start();
        let solution = Solver::new(calibration.clone())
            .context("invalid calibration")?
            .with_threads(threads)
            .solve();
        let diff = cpu0.elapsed_secs();

        if !solution.is_converged() {
            bail!(
                "sample #{} did not converge after {} iterations",
                i + 1,
                solution.iterations()
            );
        }
        let result = solution
            .diagnostic()
            .context("diagnostic policy cell lies outside the capital grid")?;
        if result != REFERENCE_CHECK {
            bail!(
                "sample #{} check {} differs from reference {}",
                i + 1,
                result,
                REFERENCE_CHECK
            );
        }

        reporter.sample(i + 1, diff)?;
        samples.push(diff);
    }

    samples.sort_by(f64::total_cmp);
    reporter.median(samples[samples.len() / 2])?;
    Ok(())
}
