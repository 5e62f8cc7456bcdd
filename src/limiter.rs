//! The public [`RateLimiter`] facade wiring the clock, shard table, and
//! decision engine together.

use std::sync::Arc;

use crate::clock::{Clock, SteadyClock};
use crate::decision::{decide, Decision, Limit};
use crate::shard::{ShardTable, ShardTableConfig};

/// A concurrent, sharded token-bucket rate limiter.
///
/// Safe to call from any number of threads. Cheaply cloneable: both the
/// shard table and the clock are held behind an `Arc`, so cloning a
/// `RateLimiter` gives out a new handle to the same underlying state rather
/// than copying it — a single instance can be shared across workers by
/// cloning the handle instead of wrapping it in an `Arc` yourself, though
/// doing that is also harmless.
#[derive(Clone)]
pub struct RateLimiter {
    shards: Arc<ShardTable>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Builds a limiter with the default [`SteadyClock`].
    pub fn new(config: ShardTableConfig) -> Self {
        Self::with_clock(config, SteadyClock)
    }

    /// Builds a limiter with a caller-supplied clock (tests inject a
    /// [`crate::clock::VirtualClock`] here).
    pub fn with_clock(config: ShardTableConfig, clock: impl Clock + 'static) -> Self {
        Self {
            shards: Arc::new(ShardTable::new(config)),
            clock: Arc::new(clock),
        }
    }

    /// Decides whether the event identified by `key` is admitted under
    /// `limit`, creating fresh per-key state on first sight.
    ///
    /// The clock is read exactly once per call; the same timestamp is used
    /// throughout the decision engine's internal retry loop.
    pub fn allow(&self, key: impl AsRef<[u8]>, limit: Limit) -> Decision {
        let key = key.as_ref();
        let now_ns = self.clock.now_ns();
        self.shards
            .with_entry_or_insert(key, limit.capacity, now_ns, |entry| {
                decide(entry, limit, now_ns)
            })
    }

    /// Drops all per-key state across every shard.
    pub fn clear(&self) {
        self.shards.clear();
    }

    /// Approximate total number of distinct keys currently tracked.
    pub fn size(&self) -> u64 {
        self.shards.size()
    }
}

#[cfg(test)]
#[path = "limiter_test.rs"]
mod limiter_test;
