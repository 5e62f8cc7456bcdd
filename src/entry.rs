//! Per-key token-bucket state.

use std::sync::atomic::AtomicU64;

/// Fixed-point scale: the low 32 bits of `tokens_fp` are the fractional
/// remainder, the high 32 bits are whole tokens. `S = 2^32`.
pub const FP_SCALE: u64 = 1u64 << 32;

/// Per-key bucket state, owned by its shard.
///
/// Both fields are independent atomics updated via compare-and-swap; see
/// [`crate::decision::decide`] for the algorithm that keeps them consistent
/// without a per-entry lock.
#[derive(Debug)]
pub struct Entry {
    /// Current token count in Q32.32 fixed-point.
    pub(crate) tokens_fp: AtomicU64,
    /// Nanosecond timestamp of the most recent successful refill update.
    pub(crate) last_ns: AtomicU64,
}

impl Entry {
    /// Creates a full bucket (`capacity` tokens) stamped at `now_ns`.
    pub(crate) fn new_full(capacity: u64, now_ns: u64) -> Self {
        Self {
            tokens_fp: AtomicU64::new(capacity.saturating_mul(FP_SCALE)),
            last_ns: AtomicU64::new(now_ns),
        }
    }
}
