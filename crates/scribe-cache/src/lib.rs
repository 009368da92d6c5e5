//! In-memory memoization for expensive async lookups.
//!
//! [`MemoCache`] maps a canonical argument key to the lookup's result. Entries
//! live until they are invalidated or the cache is cleared; there is no TTL
//! and no size-based eviction. Concurrent requests for the same key share a
//! single in-flight computation.

mod memo;

pub use memo::{memoize, MemoCache, MemoStats, Memoized};
