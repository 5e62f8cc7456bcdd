//! The token-bucket decision engine: the refill/consume algorithm and its
//! retry loop over compare-and-swap primitives.

use std::sync::atomic::Ordering;

use crate::entry::{Entry, FP_SCALE};

const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MS: u128 = 1_000_000;

/// A rate limit policy: how many tokens the bucket holds and how fast it
/// refills.
///
/// `refill_per_sec = 0` means "no refill ever"; `capacity = 0` means the
/// bucket can never hold a token and every query is denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    /// Maximum number of whole tokens the bucket can hold.
    pub capacity: u64,
    /// Whole tokens credited to the bucket per second.
    pub refill_per_sec: u64,
}

impl Limit {
    /// Creates a new limit.
    pub fn new(capacity: u64, refill_per_sec: u64) -> Self {
        Self {
            capacity,
            refill_per_sec,
        }
    }
}

/// The outcome of an admission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the event is admitted.
    pub allowed: bool,
    /// Whole tokens remaining after this decision (floor).
    pub remaining: u64,
    /// Milliseconds until at least one token becomes available.
    ///
    /// `0` when `allowed` is `true`, or when refill is impossible
    /// (`refill_per_sec == 0`).
    pub reset_ms: u64,
}

impl Decision {
    const fn deny_zero() -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_ms: 0,
        }
    }
}

/// Runs the refill/consume decision against `entry` for `limit` at
/// `now_ns`, which the caller must have captured exactly once for this
/// call — the retry loop below never re-reads the clock.
///
/// This is the hot path: a compare-and-swap retry loop with no blocking and
/// no allocation, correct for any number of concurrent callers racing on
/// the same entry.
pub fn decide(entry: &Entry, limit: Limit, now_ns: u64) -> Decision {
    if limit.capacity == 0 {
        return Decision::deny_zero();
    }

    let cap_fp = limit.capacity.saturating_mul(FP_SCALE);
    let rate = limit.refill_per_sec;
    let no_refill = rate == 0;

    loop {
        let last = entry.last_ns.load(Ordering::Acquire);
        let tokens0 = entry.tokens_fp.load(Ordering::Relaxed);

        let delta_ns = now_ns.saturating_sub(last);

        let add_fp = if no_refill || delta_ns == 0 {
            0u64
        } else {
            let num = (delta_ns as u128) * (rate as u128) * (FP_SCALE as u128);
            let scaled = num / NANOS_PER_SEC;
            u64::try_from(scaled).unwrap_or(u64::MAX)
        };

        let mut tokens1 = tokens0.saturating_add(add_fp);
        if tokens1 > cap_fp {
            tokens1 = cap_fp;
        }

        if tokens1 >= FP_SCALE {
            let tokens2 = tokens1 - FP_SCALE;

            if delta_ns > 0
                && entry
                    .last_ns
                    .compare_exchange(last, now_ns, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
            {
                continue;
            }
            if entry
                .tokens_fp
                .compare_exchange(tokens0, tokens2, Ordering::AcqRel, Ordering::Relaxed)
                .is_err()
            {
                continue;
            }

            return Decision {
                allowed: true,
                remaining: tokens2 / FP_SCALE,
                reset_ms: 0,
            };
        } else {
            if delta_ns > 0 {
                if entry
                    .last_ns
                    .compare_exchange(last, now_ns, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    continue;
                }
                entry.tokens_fp.store(tokens1, Ordering::Release);
            }

            let reset_ms = if no_refill {
                0
            } else {
                let missing_fp = FP_SCALE.saturating_sub(tokens1);
                let num = (missing_fp as u128) * NANOS_PER_SEC;
                let den = (rate as u128) * (FP_SCALE as u128);
                // ceil(num / den), then ceil(ns / 1_000_000) -> ceil(num / (den * 1e6))
                let ns_needed = num.div_ceil(den);
                let ms = ns_needed.div_ceil(NANOS_PER_MS);
                u64::try_from(ms).unwrap_or(u64::MAX)
            };

            return Decision {
                allowed: false,
                remaining: tokens1 / FP_SCALE,
                reset_ms,
            };
        }
    }
}

#[cfg(test)]
#[path = "decision_test.rs"]
mod decision_test;
