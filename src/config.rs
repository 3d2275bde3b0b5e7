//! Command-line arguments and the validated run configuration.

use clap::{Parser, ValueEnum};

use crate::error::Error;
use crate::matrix::MAX_DIMENSION;
use crate::stats::AveragePolicy;

/// Times a parallel dense matrix multiply over repeated trials.
#[derive(Debug, Parser)]
#[command(name = "dense_mm", version, about)]
pub struct Args {
    /// Side length N of the N×N matrices (1..=65536)
    #[arg(value_name = "SIZE")]
    pub size: u64,

    /// Number of timed trials
    #[arg(value_name = "ITERATIONS")]
    pub iterations: u32,

    /// Worker threads for the multiply; defaults to rayon's sizing
    #[arg(short, long, env = "DENSE_MM_THREADS")]
    pub threads: Option<usize>,

    /// Check every parallel product against a sequential one
    #[arg(
        long,
        env = "DENSE_MM_VERIFY",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub verify: bool,

    /// Timing source
    #[arg(long, value_enum, default_value_t = ClockKind::Monotonic)]
    pub clock: ClockKind,

    /// How the average line is computed
    #[arg(long, value_enum, default_value_t = AveragePolicy::FieldWise)]
    pub average: AveragePolicy,

    /// Seed for the input generator; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClockKind {
    /// Monotonic clock, reported as seconds.nanoseconds
    Monotonic,
    /// x86-64 time-stamp counter, reported in cycles
    Tsc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dimension: usize,
    pub iterations: u32,
    pub threads: Option<usize>,
    pub verify: bool,
    pub clock: ClockKind,
    pub average: AveragePolicy,
    pub seed: Option<u64>,
}

impl Config {
    /// Defaults for everything but the two required values.
    pub fn new(dimension: usize, iterations: u32) -> Self {
        Config {
            dimension,
            iterations,
            threads: None,
            verify: false,
            clock: ClockKind::Monotonic,
            average: AveragePolicy::FieldWise,
            seed: None,
        }
    }
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self, Error> {
        let dimension = usize::try_from(args.size)
            .ok()
            .filter(|n| (1..=MAX_DIMENSION).contains(n))
            .ok_or(Error::InvalidDimension(args.size))?;
        if args.iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        Ok(Config {
            dimension,
            iterations: args.iterations,
            threads: args.threads.filter(|&n| n > 0),
            verify: args.verify,
            clock: args.clock,
            average: args.average,
            seed: args.seed,
        })
    }
}
