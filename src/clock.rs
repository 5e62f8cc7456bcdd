//! Monotonic clock abstraction.
//!
//! The decision engine depends only on [`Clock::now_ns`]; production code
//! gets a [`SteadyClock`], tests get a [`VirtualClock`] they can advance by
//! hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// A source of monotonically non-decreasing nanosecond timestamps.
///
/// Implementations must be wait-free and safe to call from any thread.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp in nanoseconds.
    ///
    /// Successive calls on the same `Clock` instance, from any thread, must
    /// never observe a decreasing value.
    fn now_ns(&self) -> u64;
}

/// Steady, wall-clock-independent monotonic clock.
///
/// Anchors on a process-wide [`Instant`] so that callers observe elapsed
/// nanoseconds since the anchor rather than raw `Instant` internals, which
/// keeps the value a plain `u64` usable in the fixed-point arithmetic below.
#[derive(Debug, Default, Clone, Copy)]
pub struct SteadyClock;

impl SteadyClock {
    #[inline]
    fn anchor() -> Instant {
        static START: OnceLock<Instant> = OnceLock::new();
        *START.get_or_init(Instant::now)
    }
}

impl Clock for SteadyClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        Self::anchor()
            .elapsed()
            .as_nanos()
            .try_into()
            .unwrap_or(u64::MAX)
    }
}

/// A controllable clock for deterministic tests.
///
/// Starts at nanosecond `0` and only ever moves forward via [`set`] or
/// [`advance`], matching the `FakeClock` used by the reference test suite.
///
/// [`set`]: VirtualClock::set
/// [`advance`]: VirtualClock::advance
#[derive(Debug, Default)]
pub struct VirtualClock {
    now_ns: AtomicU64,
}

impl VirtualClock {
    /// Creates a new virtual clock starting at `t = 0`.
    pub fn new() -> Self {
        Self {
            now_ns: AtomicU64::new(0),
        }
    }

    /// Sets the clock to an absolute nanosecond value.
    pub fn set(&self, now_ns: u64) {
        self.now_ns.store(now_ns, Ordering::SeqCst);
    }

    /// Advances the clock by the given number of nanoseconds.
    pub fn advance(&self, delta_ns: u64) {
        self.now_ns.fetch_add(delta_ns, Ordering::SeqCst);
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.advance(delta_ms.saturating_mul(1_000_000));
    }
}

impl Clock for VirtualClock {
    #[inline]
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;
