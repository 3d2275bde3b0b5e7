//! Exact (seconds, nanoseconds) arithmetic for monotonic timestamps.
//!
//! A [`Timespec`] serves both as a point on a monotonic clock and as the
//! distance between two such points. The nanosecond field is kept in
//! `[0, NANOS_PER_SEC)` by every operation; the seconds field absorbs the
//! borrow or carry and may go negative when a later reading is subtracted
//! from an earlier one.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

pub const NANOS_PER_SEC: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timespec {
    pub sec: i64,
    pub nsec: i64,
}

impl Timespec {
    pub const ZERO: Timespec = Timespec { sec: 0, nsec: 0 };

    /// Largest representable value with a normalized nanosecond field.
    pub const MAX: Timespec = Timespec {
        sec: i64::MAX,
        nsec: NANOS_PER_SEC - 1,
    };

    /// Builds a timespec, folding any whole seconds in `nsec` into `sec`.
    pub fn new(sec: i64, nsec: i64) -> Self {
        Timespec {
            sec: sec + nsec.div_euclid(NANOS_PER_SEC),
            nsec: nsec.rem_euclid(NANOS_PER_SEC),
        }
    }

    /// `self - other`, borrowing one second when the nanosecond difference
    /// goes negative.
    pub fn subtract(self, other: Timespec) -> Timespec {
        let mut sec = self.sec.saturating_sub(other.sec);
        let mut nsec = self.nsec - other.nsec;
        if nsec < 0 {
            sec = sec.saturating_sub(1);
            nsec += NANOS_PER_SEC;
        }
        Timespec { sec, nsec }
    }

    /// `self + other`, carrying one second when the nanosecond sum reaches
    /// a full second.
    pub fn add(self, other: Timespec) -> Timespec {
        let mut sec = self.sec.saturating_add(other.sec);
        let mut nsec = self.nsec + other.nsec;
        if nsec >= NANOS_PER_SEC {
            sec = sec.saturating_add(1);
            nsec -= NANOS_PER_SEC;
        }
        Timespec { sec, nsec }
    }

    pub fn is_negative(&self) -> bool {
        self.sec < 0
    }

    pub fn as_nanos(&self) -> i128 {
        self.sec as i128 * NANOS_PER_SEC as i128 + self.nsec as i128
    }

    /// Inverse of [`Timespec::as_nanos`]; saturates outside the `i64` seconds range.
    pub fn from_nanos(nanos: i128) -> Timespec {
        let per_sec = NANOS_PER_SEC as i128;
        let sec = nanos.div_euclid(per_sec);
        let nsec = nanos.rem_euclid(per_sec) as i64;
        match i64::try_from(sec) {
            Ok(sec) => Timespec { sec, nsec },
            Err(_) if sec > 0 => Timespec::MAX,
            Err(_) => Timespec { sec: i64::MIN, nsec: 0 },
        }
    }
}

/// Lexicographic on (seconds, nanoseconds).
///
/// This is the single comparator the statistics reduction relies on for both
/// extremes.
pub fn compare(a: &Timespec, b: &Timespec) -> Ordering {
    a.sec.cmp(&b.sec).then(a.nsec.cmp(&b.nsec))
}

impl Ord for Timespec {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Timespec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Sub for Timespec {
    type Output = Timespec;

    fn sub(self, rhs: Timespec) -> Timespec {
        self.subtract(rhs)
    }
}

impl Add for Timespec {
    type Output = Timespec;

    fn add(self, rhs: Timespec) -> Timespec {
        Timespec::add(self, rhs)
    }
}

impl From<Duration> for Timespec {
    fn from(d: Duration) -> Self {
        Timespec {
            sec: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            nsec: i64::from(d.subsec_nanos()),
        }
    }
}

#[cfg(unix)]
impl From<libc::timespec> for Timespec {
    #[allow(clippy::unnecessary_cast)]
    fn from(ts: libc::timespec) -> Self {
        Timespec::new(ts.tv_sec as i64, ts.tv_nsec as i64)
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(sec: i64, nsec: i64) -> Timespec {
        Timespec { sec, nsec }
    }

    #[test]
    fn subtract_equal_is_zero() {
        let t = ts(12, 345_678_901);
        assert_eq!(t - t, Timespec::ZERO);
    }

    #[test]
    fn subtract_borrows_a_second() {
        assert_eq!(ts(5, 100) - ts(3, 200), ts(1, 999_999_900));
    }

    #[test]
    fn subtract_earlier_from_later_is_negative() {
        let d = ts(1, 0) - ts(2, 500);
        assert!(d.is_negative());
        assert_eq!(d, ts(-2, 999_999_500));
    }

    #[test]
    fn subtract_saturates_at_the_bounds() {
        assert_eq!(Timespec::MAX - ts(-1, 0), Timespec::MAX);
        assert_eq!(ts(i64::MIN, 0) - ts(0, 1), ts(i64::MIN, 999_999_999));
    }

    #[test]
    fn add_carries_a_second() {
        assert_eq!(ts(1, 600_000_000) + ts(2, 400_000_000), ts(4, 0));
        assert_eq!(ts(0, 999_999_999) + ts(0, 2), ts(1, 1));
    }

    #[test]
    fn add_without_carry() {
        assert_eq!(ts(1, 1) + ts(2, 2), ts(3, 3));
    }

    #[test]
    fn new_normalizes_nanoseconds() {
        assert_eq!(Timespec::new(1, 2_500_000_000), ts(3, 500_000_000));
        assert_eq!(Timespec::new(1, -1), ts(0, 999_999_999));
    }

    #[test]
    fn ordering_is_seconds_then_nanoseconds() {
        assert!(ts(1, 999_999_999) < ts(2, 0));
        assert!(ts(2, 1) > ts(2, 0));
        assert!(Timespec::ZERO < Timespec::MAX);
    }

    #[test]
    fn display_pads_nanoseconds() {
        assert_eq!(ts(0, 1_234).to_string(), "0.000001234");
        assert_eq!(ts(17, 0).to_string(), "17.000000000");
    }

    #[test]
    fn nanos_conversion() {
        assert_eq!(ts(2, 5).as_nanos(), 2_000_000_005);
        assert_eq!(Timespec::from_nanos(2_000_000_005), ts(2, 5));
        assert_eq!(Timespec::from(Duration::new(3, 7)), ts(3, 7));
    }

    fn timespec() -> impl Strategy<Value = Timespec> {
        (0i64..1_000_000, 0i64..NANOS_PER_SEC).prop_map(|(sec, nsec)| ts(sec, nsec))
    }

    proptest! {
        #[test]
        fn subtract_then_add_restores(a in timespec(), b in timespec()) {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            let d = hi - lo;
            prop_assert!(!d.is_negative());
            prop_assert!((0..NANOS_PER_SEC).contains(&d.nsec));
            prop_assert_eq!(lo + d, hi);
        }

        #[test]
        fn add_keeps_nanoseconds_normalized(a in timespec(), b in timespec()) {
            let sum = a + b;
            prop_assert!((0..NANOS_PER_SEC).contains(&sum.nsec));
            prop_assert_eq!(sum.as_nanos(), a.as_nanos() + b.as_nanos());
        }

        #[test]
        fn subtract_self_is_zero(t in timespec()) {
            prop_assert_eq!(t - t, Timespec::ZERO);
        }
    }
}
