//! The shard table: maps keys to per-key [`Entry`] state with concurrent
//! readers and serialised inserters, distributing load across shards so
//! unrelated keys never contend on the same lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::RwLock;

use crate::entry::Entry;
use crate::hash::fnv1a_64;

/// Default number of shards when unset by [`ShardTableConfig`].
pub const DEFAULT_SHARDS: usize = 128;

/// Default per-shard map reservation hint.
pub const DEFAULT_CAPACITY_HINT_PER_SHARD: usize = 1024;

/// Construction parameters for a [`ShardTable`].
///
/// Both fields are purely allocation hints; neither affects the admission
/// semantics of the limiter.
#[derive(Debug, Clone, Copy)]
pub struct ShardTableConfig {
    /// Number of shards. Rounded up to the next power of two (floor 1) if
    /// not already one.
    pub shards: usize,
    /// Initial reservation hint passed to each shard's map.
    pub capacity_hint_per_shard: usize,
}

impl Default for ShardTableConfig {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARDS,
            capacity_hint_per_shard: DEFAULT_CAPACITY_HINT_PER_SHARD,
        }
    }
}

impl ShardTableConfig {
    /// Creates a config with the given shard count and per-shard capacity
    /// hint, normalising the shard count to a power of two.
    pub fn new(shards: usize, capacity_hint_per_shard: usize) -> Self {
        Self {
            shards,
            capacity_hint_per_shard,
        }
    }

    /// Returns the shard count rounded up to the next power of two, floored
    /// at 1. `0` rounds up to `1`.
    fn normalised_shards(&self) -> usize {
        self.shards.max(1).next_power_of_two()
    }

    /// Validates that the (normalised) shard count and capacity hint won't
    /// overflow the reservation arithmetic `shards * capacity_hint_per_shard`.
    ///
    /// `ShardTable::new` does not call this itself — it is infallible by
    /// design, normalising rather than rejecting — but it is available for
    /// adapters that accept untrusted configuration and want to fail fast
    /// before construction.
    pub fn validate(&self) -> Result<(), crate::error::RateLimiterError> {
        let shards = self.normalised_shards();
        if shards
            .checked_mul(self.capacity_hint_per_shard)
            .is_none()
        {
            return Err(crate::error::RateLimiterError::CapacityHintOverflow {
                hint: self.capacity_hint_per_shard,
                shards,
            });
        }
        Ok(())
    }
}

/// One independently-locked partition of the key space.
///
/// Entries are individually heap-boxed so the map's internal rehashing only
/// ever moves box pointers, never the entry storage itself — a reference
/// taken under the shard's read lock stays valid after the lock is released
/// (barring a concurrent [`ShardTable::clear`]).
struct Shard {
    table: RwLock<HashMap<Box<[u8]>, Box<Entry>>>,
    size: AtomicI64,
}

impl Shard {
    fn with_capacity(capacity_hint: usize) -> Self {
        Self {
            table: RwLock::new(HashMap::with_capacity(capacity_hint)),
            size: AtomicI64::new(0),
        }
    }

    fn clear(&self) {
        let mut table = self.table.write();
        table.clear();
        self.size.store(0, Ordering::Relaxed);
    }

    fn len(&self) -> i64 {
        self.size.load(Ordering::Relaxed)
    }
}

/// A fixed-size array of [`Shard`]s, selected by a hash of the key masked to
/// the shard count.
pub struct ShardTable {
    shards: Box<[Shard]>,
    mask: u64,
}

impl ShardTable {
    /// Builds a new shard table from `config`.
    pub fn new(config: ShardTableConfig) -> Self {
        let n = config.normalised_shards();
        let mut shards = Vec::with_capacity(n);
        for _ in 0..n {
            shards.push(Shard::with_capacity(config.capacity_hint_per_shard));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(shards = n, "shard table constructed");

        Self {
            shards: shards.into_boxed_slice(),
            mask: (n - 1) as u64,
        }
    }

    #[inline]
    fn shard_for(&self, key: &[u8]) -> &Shard {
        let idx = (fnv1a_64(key) & self.mask) as usize;
        &self.shards[idx]
    }

    /// Looks up the entry for `key`, creating a fresh full bucket stamped at
    /// `now_ns` on first sight, then runs `f` against it while holding the
    /// appropriate shard lock.
    ///
    /// Implements the lookup protocol: a shared-lock probe first; only on a
    /// miss does it escalate to the exclusive lock, re-probing in case a
    /// concurrent inserter raced ahead of us.
    pub fn with_entry_or_insert<R>(
        &self,
        key: &[u8],
        capacity: u64,
        now_ns: u64,
        f: impl FnOnce(&Entry) -> R,
    ) -> R {
        let shard = self.shard_for(key);

        {
            let table = shard.table.read();
            if let Some(entry) = table.get(key) {
                return f(entry);
            }
        }

        let mut table = shard.table.write();
        if let Some(entry) = table.get(key) {
            return f(entry);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(key_len = key.len(), "first-sight key inserted");

        let entry = Box::new(Entry::new_full(capacity, now_ns));
        let boxed: &mut Box<Entry> = table.entry(key.into()).or_insert(entry);
        shard.size.fetch_add(1, Ordering::Relaxed);
        f(boxed.as_ref())
    }

    /// Drops every entry in every shard, resetting size counters to zero.
    ///
    /// A stop-the-world operation per shard; does not block other shards
    /// from making progress concurrently.
    pub fn clear(&self) {
        #[cfg(feature = "tracing")]
        tracing::info!("shard table cleared");

        for shard in self.shards.iter() {
            shard.clear();
        }
    }

    /// Sum of per-shard approximate sizes, each observed under that shard's
    /// read lock. The result is a snapshot: concurrent inserts racing with
    /// this call may not yet be reflected.
    pub fn size(&self) -> u64 {
        self.shards
            .iter()
            .map(|s| {
                let _guard = s.table.read();
                s.len().max(0) as u64
            })
            .sum()
    }

    /// Number of shards in the table (post-normalisation).
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

#[cfg(test)]
#[path = "shard_test.rs"]
mod shard_test;
