//! A concurrent, sharded, in-process token-bucket rate limiter.
//!
//! `ratelimit-core` answers, for a textual key and a `(capacity,
//! refill_per_sec)` policy, whether an event is admitted now, how many
//! whole tokens remain, and — when denied — how many milliseconds until
//! the next token becomes available. It is built to be embedded inside a
//! host process and called from many threads per second on the hot
//! request path.
//!
//! ```
//! use ratelimit_core::{Limit, RateLimiter, ShardTableConfig};
//!
//! let limiter = RateLimiter::new(ShardTableConfig::default());
//! let limit = Limit::new(10, 5); // 10-token bucket, refills at 5/sec
//! let decision = limiter.allow("user:42", limit);
//! assert!(decision.allowed);
//! ```
//!
//! Foreign-language bindings, CLIs, microbenchmarks, key eviction/TTL, and
//! cross-process coordination are explicitly out of scope for this crate;
//! host applications compose it with whatever I/O or distribution layer
//! they need.

pub mod clock;
pub mod decision;
pub mod entry;
pub mod error;
pub mod hash;
pub mod limiter;
pub mod shard;

pub use clock::{Clock, SteadyClock, VirtualClock};
pub use decision::{Decision, Limit};
pub use error::RateLimiterError;
pub use limiter::RateLimiter;
pub use shard::{ShardTableConfig, DEFAULT_CAPACITY_HINT_PER_SHARD, DEFAULT_SHARDS};
