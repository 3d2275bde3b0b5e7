//! Timed trials: generate inputs, multiply between two clock readings, record.

use std::io::Write;

use rayon::ThreadPool;

use crate::clock::Clock;
use crate::error::Result;
use crate::kernel;
use crate::matrix::MatrixGenerator;

/// Runs trials of one dimension on a shared worker pool.
///
/// Progress lines go to `out`; each trial owns its matrices and drops them
/// before the next one starts.
pub struct TrialRunner<'a, C, W> {
    clock: C,
    pool: &'a ThreadPool,
    generator: MatrixGenerator,
    dimension: usize,
    verify: bool,
    out: W,
}

impl<'a, C: Clock, W: Write> TrialRunner<'a, C, W> {
    pub fn new(
        clock: C,
        pool: &'a ThreadPool,
        generator: MatrixGenerator,
        dimension: usize,
        out: W,
    ) -> Self {
        TrialRunner {
            clock,
            pool,
            generator,
            dimension,
            verify: false,
            out,
        }
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Runs one trial and returns its elapsed time.
    pub fn run_trial(&mut self, index: u32) -> Result<C::Reading> {
        log::debug!("trial {index}: generating");
        writeln!(self.out, "Generating matrices...")?;
        let mut m = self.generator.generate(self.dimension)?;

        log::debug!("trial {index}: timing");
        writeln!(self.out, "Multiplying matrices...")?;
        self.out.flush()?;
        let start = self.clock.now();
        self.pool.install(|| kernel::multiply(&m.a, &m.b, &mut m.c));
        let end = self.clock.now();
        let elapsed = self.clock.elapsed(start, end);
        writeln!(self.out, "Multiplication done!")?;

        if self.verify {
            writeln!(self.out, "Verifying parallel matrix multiplication...")?;
            kernel::verify(&m.a, &m.b, &m.c)?;
        }

        log::debug!("trial {index}: done in {elapsed}");
        Ok(elapsed)
    }

    /// Runs `iterations` trials in order; the first failure ends the run.
    pub fn run(&mut self, iterations: u32) -> Result<Vec<C::Reading>> {
        let mut record = Vec::with_capacity(iterations as usize);
        for index in 0..iterations {
            record.push(self.run_trial(index)?);
        }
        Ok(record)
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
