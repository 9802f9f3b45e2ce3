use std::time::{Duration, Instant};

/// Wall-clock source for search deadlines.
///
/// Deadlines are expressed as a duration since the clock's origin, so the
/// search never reads a shared start time of its own.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Monotonic wall time (`Instant`), never CPU time.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Clock whose origin is now. A player process should create it first
    /// thing so start-up and board loading count against the same budget.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[must_use]
    pub const fn with_origin(origin: Instant) -> Self {
        Self { origin }
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}
