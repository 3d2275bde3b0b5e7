//! Dense matrix multiply kernels.
//!
//! The parallel kernel splits the (row, col) output space into independent
//! tasks on a rayon pool. Every task owns exactly one element of `C`, so the
//! only synchronization is the fork and join around the whole product.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Builds the worker pool shared by every trial of a run.
///
/// `threads` of `None` keeps rayon's default sizing, which honours
/// `RAYON_NUM_THREADS`.
pub fn build_pool(threads: Option<usize>) -> Result<ThreadPool> {
    let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("dense-mm-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;
    log::info!("worker pool ready with {} threads", pool.current_num_threads());
    Ok(pool)
}

#[inline]
fn dot(a: &[f64], b: &[f64], n: usize, row: usize, col: usize) -> f64 {
    let mut sum = 0.0f64;
    for k in 0..n {
        sum += a[row * n + k] * b[k * n + col];
    }
    sum
}

/// `C += A * B`, with the (row, col) space spread over the current rayon pool.
pub fn multiply(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = check_dims(a, b, c);
    let (a, b) = (a.as_slice(), b.as_slice());
    c.as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(idx, out)| {
            *out += dot(a, b, n, idx / n, idx % n);
        });
}

/// `C += A * B` on the calling thread, in the same per-element summation order
/// as [`multiply`].
pub fn multiply_sequential(a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = check_dims(a, b, c);
    let (a, b) = (a.as_slice(), b.as_slice());
    let out = c.as_mut_slice();
    for col in 0..n {
        for row in 0..n {
            out[row * n + col] += dot(a, b, n, row, col);
        }
    }
}

/// Recomputes `A * B` sequentially and requires bit-for-bit agreement with
/// the parallel result in `parallel`.
pub fn verify(a: &Matrix, b: &Matrix, parallel: &Matrix) -> Result<()> {
    let mut sequential = Matrix::zeroed(a.dim())?;
    multiply_sequential(a, b, &mut sequential);

    let mismatch = parallel
        .as_slice()
        .iter()
        .zip(sequential.as_slice())
        .position(|(p, s)| p != s);
    match mismatch {
        None => Ok(()),
        Some(index) => Err(Error::VerificationFailed {
            index,
            parallel: parallel.as_slice()[index],
            sequential: sequential.as_slice()[index],
        }),
    }
}

fn check_dims(a: &Matrix, b: &Matrix, c: &Matrix) -> usize {
    let n = a.dim();
    assert!(
        b.dim() == n && c.dim() == n,
        "dimension mismatch: {}x{} * {}x{} -> {}x{}",
        n,
        n,
        b.dim(),
        b.dim(),
        c.dim(),
        c.dim()
    );
    n
}
