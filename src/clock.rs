//! Timing sources for the trial runner.

use std::fmt;

use crate::error::{Error, Result};
use crate::stats::Sample;
use crate::timespec::Timespec;

/// A source of readings whose differences are trial durations.
pub trait Clock {
    type Reading: Sample;

    fn now(&self) -> Self::Reading;

    /// Elapsed time between two readings taken on this clock.
    fn elapsed(&self, start: Self::Reading, end: Self::Reading) -> Self::Reading {
        end.since(start)
    }
}

/// Monotonic, non-adjustable clock reported as a [`Timespec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

#[cfg(target_os = "linux")]
const CLOCK_ID: libc::clockid_t = libc::CLOCK_MONOTONIC_RAW;

#[cfg(all(unix, not(target_os = "linux")))]
const CLOCK_ID: libc::clockid_t = libc::CLOCK_MONOTONIC;

impl Clock for MonotonicClock {
    type Reading = Timespec;

    #[cfg(unix)]
    fn now(&self) -> Timespec {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` is a valid, writable timespec and CLOCK_ID is supported
        // on every target this branch compiles for.
        let rc = unsafe { libc::clock_gettime(CLOCK_ID, &mut ts) };
        debug_assert_eq!(rc, 0, "clock_gettime failed");
        Timespec::from(ts)
    }

    #[cfg(not(unix))]
    fn now(&self) -> Timespec {
        use std::sync::OnceLock;
        use std::time::Instant;

        static ANCHOR: OnceLock<Instant> = OnceLock::new();
        Timespec::from(ANCHOR.get_or_init(Instant::now).elapsed())
    }
}

/// Raw time-stamp counter ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cycles(pub u64);

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// x86-64 time-stamp counter.
#[derive(Debug, Clone, Copy)]
pub struct CycleCounter {
    _private: (),
}

impl CycleCounter {
    pub fn new() -> Result<Self> {
        if cfg!(target_arch = "x86_64") {
            Ok(CycleCounter { _private: () })
        } else {
            Err(Error::UnsupportedClock("tsc"))
        }
    }
}

impl Clock for CycleCounter {
    type Reading = Cycles;

    #[cfg(target_arch = "x86_64")]
    fn now(&self) -> Cycles {
        // SAFETY: rdtsc has no preconditions on x86-64.
        Cycles(unsafe { core::arch::x86_64::_rdtsc() })
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn now(&self) -> Cycles {
        // Unreachable: `CycleCounter::new` refuses to construct one here.
        Cycles(0)
    }
}
