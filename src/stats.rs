//! Reduction of a trial record into min, max and average.

use std::cmp::Ordering;
use std::fmt;

use crate::clock::Cycles;
use crate::error::{Error, Result};
use crate::timespec::{self, Timespec};

/// One measured trial duration.
pub trait Sample: Copy + fmt::Display + Send {
    /// Smallest possible duration; seeds the running maximum.
    const ZERO: Self;
    /// Largest possible duration; seeds the running minimum.
    const MAX: Self;
    /// Appended to the report labels, e.g. `" (tsc)"`.
    const UNIT_LABEL: &'static str;

    /// Duration ordering shared by both extremes.
    fn compare(a: &Self, b: &Self) -> Ordering;
    fn since(self, earlier: Self) -> Self;
    fn accumulate(self, other: Self) -> Self;
    /// Average of `sum` over `count` trials as the reference harness computes it.
    fn divide(sum: Self, count: u32) -> Self;
    /// Exact mean, for when the default division loses too much.
    fn precise_mean(record: &[Self]) -> Self;
}

impl Sample for Timespec {
    const ZERO: Self = Timespec::ZERO;
    const MAX: Self = Timespec::MAX;
    const UNIT_LABEL: &'static str = "";

    fn compare(a: &Self, b: &Self) -> Ordering {
        timespec::compare(a, b)
    }

    fn since(self, earlier: Self) -> Self {
        self.subtract(earlier)
    }

    fn accumulate(self, other: Self) -> Self {
        self.add(other)
    }

    /// Divides each field independently. A remainder in the seconds field is
    /// dropped rather than moved into the nanoseconds.
    fn divide(sum: Self, count: u32) -> Self {
        let count = i64::from(count);
        Timespec {
            sec: sum.sec / count,
            nsec: sum.nsec / count,
        }
    }

    fn precise_mean(record: &[Self]) -> Self {
        if record.is_empty() {
            return Timespec::ZERO;
        }
        let total: i128 = record.iter().map(Timespec::as_nanos).sum();
        Timespec::from_nanos(total / record.len() as i128)
    }
}

impl Sample for Cycles {
    const ZERO: Self = Cycles(0);
    const MAX: Self = Cycles(u64::MAX);
    const UNIT_LABEL: &'static str = " (tsc)";

    fn compare(a: &Self, b: &Self) -> Ordering {
        a.cmp(b)
    }

    fn since(self, earlier: Self) -> Self {
        Cycles(self.0.wrapping_sub(earlier.0))
    }

    fn accumulate(self, other: Self) -> Self {
        Cycles(self.0.saturating_add(other.0))
    }

    fn divide(sum: Self, count: u32) -> Self {
        Cycles(sum.0 / u64::from(count.max(1)))
    }

    fn precise_mean(record: &[Self]) -> Self {
        if record.is_empty() {
            return Cycles(0);
        }
        let total: u128 = record.iter().map(|c| u128::from(c.0)).sum();
        Cycles((total / record.len() as u128) as u64)
    }
}

/// How the average line is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AveragePolicy {
    /// Sum with carry, then divide each field by the trial count.
    #[default]
    FieldWise,
    /// Sum in a wide integer and divide once.
    Precise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary<T> {
    pub min: T,
    pub max: T,
    pub average: T,
}

/// Running extremum: keeps `seed` until an element beats it under `wanted`.
fn extremum<T: Sample>(record: &[T], seed: T, wanted: Ordering) -> T {
    record.iter().fold(seed, |best, d| {
        if T::compare(d, &best) == wanted {
            *d
        } else {
            best
        }
    })
}

pub fn summarize<T: Sample>(record: &[T], policy: AveragePolicy) -> Result<Summary<T>> {
    let count = u32::try_from(record.len()).map_err(|_| Error::InvalidIterations)?;
    if count == 0 {
        return Err(Error::EmptyRecord);
    }

    let min = extremum(record, T::MAX, Ordering::Less);
    let max = extremum(record, T::ZERO, Ordering::Greater);

    let precise = T::precise_mean(record);
    let average = match policy {
        AveragePolicy::FieldWise => {
            let sum = record.iter().fold(T::ZERO, |acc, d| acc.accumulate(*d));
            let average = T::divide(sum, count);
            log::debug!("field-wise average {average}, precise average {precise}");
            average
        }
        AveragePolicy::Precise => precise,
    };

    Ok(Summary { min, max, average })
}
