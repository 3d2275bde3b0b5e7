use std::collections::TryReserveError;

use thiserror::Error;

use crate::matrix::MAX_DIMENSION;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix size must be between 1 and {max}, got {0}", max = MAX_DIMENSION)]
    InvalidDimension(u64),

    #[error("number of iterations must be at least 1")]
    InvalidIterations,

    #[error("failed to allocate {elements} matrix elements: {source}")]
    Allocation {
        elements: usize,
        #[source]
        source: TryReserveError,
    },

    #[error(
        "parallel result differs from sequential result at element {index}: \
         {parallel} != {sequential}"
    )]
    VerificationFailed {
        index: usize,
        parallel: f64,
        sequential: f64,
    },

    #[error("cannot summarize an empty trial record")]
    EmptyRecord,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write progress: {0}")]
    Io(#[from] std::io::Error),

    #[error("the {0} clock is not available on this platform")]
    UnsupportedClock(&'static str),
}

impl Error {
    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidDimension(_) | Error::InvalidIterations | Error::UnsupportedClock(_) => 1,
            Error::EmptyRecord | Error::Io(_) => 1,
            Error::Allocation { .. } | Error::ThreadPool(_) => 3,
            Error::VerificationFailed { .. } => 4,
        }
    }
}
