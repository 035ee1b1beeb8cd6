//! Wall-clock deadline for the route search.
//!
//! The search loop polls the deadline itself; nothing outside the solver can
//! cancel a run.  Reading the clock on every step is measurable in the inner
//! loop, so checks are throttled by masking a step counter and only querying
//! `Instant::now` when the masked value is zero.

use std::time::{Duration, Instant};

/// A cooperative, self-imposed cutoff.
///
/// Once expired, stays expired.
#[derive(Debug, Clone)]
pub struct Deadline {
    start_time:       Instant,
    time_limit:       Duration,
    clock_check_mask: u64,
    expired:          bool,
}

impl Deadline {
    /// Query the clock every 256 steps.
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x00FF;

    /// Start a deadline `time_limit` from now.
    pub fn new(time_limit: Duration) -> Self {
        Self::with_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    /// Lower mask values check more often; `0` checks on every step.
    pub fn with_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            clock_check_mask,
            expired: false,
        }
    }

    /// Throttled check for step number `step`.  Returns `true` once the
    /// deadline has passed.
    #[inline]
    pub fn check(&mut self, step: u64) -> bool {
        if !self.expired && (step & self.clock_check_mask) == 0 {
            self.expired = self.start_time.elapsed() >= self.time_limit;
        }
        self.expired
    }

    /// Unthrottled check, for coarse-grained boundaries between phases.
    pub fn check_now(&mut self) -> bool {
        if !self.expired {
            self.expired = self.start_time.elapsed() >= self.time_limit;
        }
        self.expired
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}
