use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

/// Hit/miss counters of a [`MemoCache`].
///
/// `misses` counts underlying computations that were started, including ones
/// that failed and will be retried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-flight memoization keyed by a canonical argument tuple.
///
/// Keys must be owned, normalized values (e.g. trimmed strings) so that
/// logically equal arguments map to the same entry. Failed computations are
/// not stored: the error is returned to the caller that ran the computation
/// and the next request for the key computes again.
pub struct MemoCache<K, V> {
    name: &'static str,
    entries: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the cached value for `key`, computing it with `compute` if absent.
    ///
    /// While a computation for `key` is in flight, other callers wait for it
    /// instead of starting their own. If the in-flight caller is dropped or
    /// fails, one of the waiters takes over.
    pub async fn get_or_try_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell(key);
        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value.clone());
        }

        let mut computed = false;
        let value = cell
            .get_or_try_init(|| {
                computed = true;
                self.misses.fetch_add(1, Ordering::Relaxed);
                compute()
            })
            .await?;

        if !computed {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value.clone())
    }

    /// Infallible variant of [`MemoCache::get_or_try_compute`].
    pub async fn get_or_compute<F, Fut>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let result: Result<V, Infallible> = self
            .get_or_try_compute(key, || async move { Ok(compute().await) })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Returns the cached value without computing it.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock();
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drops the entry for `key`. Returns `true` if a computed value was removed.
    ///
    /// A computation already in flight for `key` still completes for its
    /// waiters, but its result is not visible to later callers.
    pub fn invalidate(&self, key: &K) -> bool {
        let removed = self.entries.lock().remove(key);
        removed.is_some_and(|cell| cell.initialized())
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(target = "scribe.cache", cache = self.name, dropped, "cleared memo cache");
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn cell(&self, key: K) -> Arc<OnceCell<V>> {
        let mut entries = self.entries.lock();
        Arc::clone(entries.entry(key).or_default())
    }
}

impl<K, V> std::fmt::Debug for MemoCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("name", &self.name)
            .field("entries", &self.entries.lock().len())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

/// A lookup function wrapped with a [`MemoCache`].
///
/// Calling it with a key seen before returns the stored result without invoking
/// the function again.
pub struct Memoized<K, V, F> {
    cache: MemoCache<K, V>,
    lookup: F,
}

/// Wraps `lookup` so that identical keys are computed at most once.
pub fn memoize<K, V, F>(name: &'static str, lookup: F) -> Memoized<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    Memoized {
        cache: MemoCache::new(name),
        lookup,
    }
}

impl<K, V, F> Memoized<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub async fn call<Fut, E>(&self, key: K) -> Result<V, E>
    where
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let arg = key.clone();
        self.cache
            .get_or_try_compute(key, || (self.lookup)(arg))
            .await
    }

    pub fn cache(&self) -> &MemoCache<K, V> {
        &self.cache
    }
}
