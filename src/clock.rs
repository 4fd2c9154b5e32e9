use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic instant, measured as an offset from the owning clock's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    pub fn from_duration(offset: Duration) -> Self {
        Self(offset)
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Time between `earlier` and `self`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    pub fn after(&self, delay: Duration) -> Timestamp {
        Timestamp(self.0 + delay)
    }
}

/// Source of monotonic time for the stopwatch and the timer queue
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Seconds elapsed since `start`; never negative.
    fn elapsed_secs(&self, start: Timestamp) -> f64 {
        self.now().saturating_since(start).as_secs_f64()
    }
}

/// Production clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
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
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed())
    }
}

/// Hand-driven clock for tests. Clones share the same instant, so a test can
/// keep one handle while the game owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_handles_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), Timestamp::from_duration(Duration::from_millis(250)));
    }

    #[test]
    fn elapsed_is_never_negative() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(1));
        let future = Timestamp::from_duration(Duration::from_secs(5));
        assert_eq!(clock.elapsed_secs(future), 0.0);
    }

    #[test]
    fn elapsed_secs_tracks_advance() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(3020));
        assert!((clock.elapsed_secs(start) - 3.02).abs() < 1e-9);
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
