//! Construction-time error type.
//!
//! The hot `allow`/`clear`/`size` path never constructs or returns this —
//! a rate limiter that can fail open or closed must pick one deterministically,
//! and this crate always denies (see `decision::Decision`). This type exists
//! for the non-default constructors that accept raw, potentially untrusted
//! configuration (e.g. values deserialised from a host's own config file).

use thiserror::Error;

/// Errors reportable at construction time, kept off the `allow` hot path.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RateLimiterError {
    /// `capacity_hint_per_shard` was large enough that `shards *
    /// capacity_hint_per_shard` would overflow `usize` reservation math.
    #[error("capacity hint per shard ({hint}) overflows with {shards} shards")]
    CapacityHintOverflow {
        /// The requested per-shard capacity hint.
        hint: usize,
        /// The (already-normalised) shard count it was paired with.
        shards: usize,
    },
}
