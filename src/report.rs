//! Plain-text summary printed at the end of a run.

use std::fmt;

use crate::stats::{Sample, Summary};

/// The `STATS:` block printed once every trial has finished.
pub struct Report<'a, T>(pub &'a Summary<T>);

impl<T: Sample> fmt::Display for Report<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = T::UNIT_LABEL;
        writeln!(f, "STATS: ")?;
        writeln!(f, "Longest Multiplication{unit}: {}", self.0.max)?;
        writeln!(f, "Shortest Multiplication{unit}: {}", self.0.min)?;
        writeln!(f, "Average Multiplication{unit}: {}", self.0.average)
    }
}
