//! Timing capability for the benchmark drivers.
//!
//! Drivers never read `Instant` directly; they go through [`Clock`] so tests
//! can substitute a deterministic source. The production implementation is a
//! monotonic wall-clock with nanosecond-level granularity on mainstream
//! platforms. Readings close to the granularity floor are imprecise rather
//! than wrong; the sweep logs a warning for such measurements instead of
//! failing.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps.
///
/// `now` returns the time elapsed since an arbitrary fixed origin. Two
/// readings bracket a measured region; their difference is the elapsed time.
pub trait Clock {
    /// Current offset from the clock's origin.
    fn now(&self) -> Duration;
}

/// Monotonic clock backed by [`std::time::Instant`].
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock for tests.
///
/// Every reading advances the clock by a fixed tick, so a region bracketed by
/// two readings always measures exactly one tick. `advance` inserts extra
/// time between readings when a test needs unequal intervals.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Duration>,
    tick: Duration,
}

impl ManualClock {
    pub fn new(tick: Duration) -> Self {
        ManualClock {
            now: Cell::new(Duration::ZERO),
            tick,
        }
    }

    /// Moves the clock forward without counting as a reading.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let current = self.now.get();
        self.now.set(current + self.tick);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_is_monotonic() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_ticks_per_reading() {
        let clock = ManualClock::new(Duration::from_millis(10));

        let start = clock.now();
        let end = clock.now();

        assert_eq!(start, Duration::ZERO);
        assert_eq!(end - start, Duration::from_millis(10));
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(Duration::from_millis(1));

        let start = clock.now();
        clock.advance(Duration::from_secs(2));
        let end = clock.now();

        assert_eq!(end - start, Duration::from_secs(2) + Duration::from_millis(1));
    }
}
