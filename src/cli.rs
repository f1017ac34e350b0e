use clap::Parser;

use rbc::calibration::MAX_ITERATIONS;

/// Basic RBC model with full depreciation, solved by value function iteration.
#[derive(Parser)]
#[command(
    name = "rbc",
    version,
    about = "Value function iteration for the basic RBC model"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Solve five times without progress output and report the median time.
    #[arg(long)]
    pub sample: bool,

    /// Worker threads; defaults to the number of CPUs, 1 runs sequentially.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Give up after this many iterations.
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,
}
