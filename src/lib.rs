//! Microbenchmark harness timing a parallel dense matrix multiply.
//!
//! Each trial multiplies two fresh pseudo-random N×N matrices on a shared
//! rayon pool between two clock readings. The per-trial durations are then
//! reduced to the longest, shortest and average multiplication.

pub mod clock;
pub mod config;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod report;
pub mod stats;
pub mod timespec;
pub mod trial;

use std::io::Write;

use crate::clock::{Clock, CycleCounter, MonotonicClock};
use crate::config::{ClockKind, Config};
use crate::matrix::MatrixGenerator;
use crate::report::Report;
use crate::stats::summarize;
use crate::trial::TrialRunner;

pub use crate::error::{Error, Result};

/// Runs every configured trial and writes progress plus the summary to `out`.
///
/// Nothing is summarized unless all trials succeed.
pub fn run<W: Write>(config: &Config, out: W) -> Result<()> {
    match config.clock {
        ClockKind::Monotonic => run_with(MonotonicClock, config, out),
        ClockKind::Tsc => run_with(CycleCounter::new()?, config, out),
    }
}

fn run_with<C: Clock, W: Write>(clock: C, config: &Config, out: W) -> Result<()> {
    if config.iterations == 0 {
        return Err(Error::InvalidIterations);
    }
    log::info!(
        "{} trials of {n}x{n} multiply, clock {:?}, verify {}",
        config.iterations,
        config.clock,
        config.verify,
        n = config.dimension,
    );
    let pool = kernel::build_pool(config.threads)?;
    let generator = MatrixGenerator::new(config.seed);

    let mut runner =
        TrialRunner::new(clock, &pool, generator, config.dimension, out).verify(config.verify);
    let record = runner.run(config.iterations)?;
    let summary = summarize(&record, config.average)?;

    let mut out = runner.into_output();
    write!(out, "{}", Report(&summary))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_prints_stats_block() {
        let mut config = Config::new(4, 3);
        config.threads = Some(2);
        let mut out = Vec::new();
        run(&config, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Generating matrices...").count(), 3);
        let stats: Vec<_> = text.lines().skip_while(|l| !l.starts_with("STATS:")).collect();
        assert_eq!(stats.len(), 4);
        assert!(stats[1].starts_with("Longest Multiplication: "));
        assert!(stats[2].starts_with("Shortest Multiplication: "));
        assert!(stats[3].starts_with("Average Multiplication: "));
    }

    #[test]
    fn zero_iterations_is_rejected_before_any_work() {
        let config = Config::new(2, 0);
        let mut out = Vec::new();
        assert!(matches!(run(&config, &mut out), Err(Error::InvalidIterations)));
        assert!(out.is_empty());
    }
}
