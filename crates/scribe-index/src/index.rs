use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use scribe_core::ScopeKey;
use scribe_scheduler::{CancellationToken, Cancelled};

use crate::error::Result;
use crate::{EntityRecord, IndexError, MandateSource};

/// What a successful [`EntityIndex::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The requested scope was already loaded.
    Unchanged,
    /// The dataset was reloaded for a new scope.
    Reloaded { records: usize },
}

/// Immutable view of the index for one scope.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    scope: Option<ScopeKey>,
    records: Vec<Arc<EntityRecord>>,
    pub(crate) folded_labels: Vec<String>,
    /// Record indices grouped by the first folded character of their label.
    pub(crate) buckets: HashMap<char, Vec<u32>>,
}

impl IndexSnapshot {
    pub fn new(scope: ScopeKey, records: Vec<EntityRecord>) -> Self {
        let mut folded_labels = Vec::with_capacity(records.len());
        let mut buckets: HashMap<char, Vec<u32>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            let folded = scribe_fuzzy::fold_case(&record.label).into_owned();
            if let Some(first) = folded.chars().next() {
                buckets.entry(first).or_default().push(idx as u32);
            }
            folded_labels.push(folded);
        }

        Self {
            scope: Some(scope),
            records: records.into_iter().map(Arc::new).collect(),
            folded_labels,
            buckets,
        }
    }

    pub fn scope(&self) -> Option<&ScopeKey> {
        self.scope.as_ref()
    }

    pub fn records(&self) -> &[Arc<EntityRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<EntityRecord>> {
        self.records.iter().find(|record| record.id == id)
    }

    pub(crate) fn record_at(&self, idx: u32) -> &Arc<EntityRecord> {
        &self.records[idx as usize]
    }
}

/// Mandate index for the current governing scope.
///
/// `refresh` is the only mutation. It is serialized, and a refresh whose
/// cancellation token fires before the load completes leaves the index as it
/// was.
pub struct EntityIndex {
    source: Arc<dyn MandateSource>,
    current: RwLock<Arc<IndexSnapshot>>,
    reload_lock: tokio::sync::Mutex<()>,
    reloads: AtomicU64,
}

impl EntityIndex {
    pub fn new(source: Arc<dyn MandateSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(IndexSnapshot::default())),
            reload_lock: tokio::sync::Mutex::new(()),
            reloads: AtomicU64::new(0),
        }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Scope the published snapshot belongs to.
    pub fn scope(&self) -> Option<ScopeKey> {
        self.current.read().scope().cloned()
    }

    /// Number of dataset loads that completed and were published.
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }

    /// Makes the index reflect `scope`.
    ///
    /// - `None` fails with [`IndexError::ScopeUnavailable`].
    /// - The already-loaded scope is a no-op.
    /// - Any other scope discards every record and reloads from the source.
    pub async fn refresh(
        &self,
        scope: Option<&ScopeKey>,
        cancel: &CancellationToken,
    ) -> Result<RefreshOutcome> {
        let scope = scope.ok_or(IndexError::ScopeUnavailable)?;
        if self.is_loaded(scope) {
            return Ok(RefreshOutcome::Unchanged);
        }

        let _guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled.into()),
            guard = self.reload_lock.lock() => guard,
        };
        // Another refresh may have loaded the same scope while we waited.
        if self.is_loaded(scope) {
            return Ok(RefreshOutcome::Unchanged);
        }

        tracing::debug!(target = "scribe.index", scope = %scope, "loading mandates");
        let loaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled.into()),
            loaded = self.source.load_mandates(scope) => loaded,
        };
        let records = match loaded {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(target = "scribe.index", scope = %scope, error = %err, "failed to load mandates");
                return Err(err.into());
            }
        };
        if cancel.is_cancelled() {
            return Err(Cancelled.into());
        }

        let count = records.len();
        let snapshot = Arc::new(IndexSnapshot::new(scope.clone(), records));
        *self.current.write() = snapshot;
        self.reloads.fetch_add(1, Ordering::Relaxed);

        tracing::info!(target = "scribe.index", scope = %scope, records = count, "mandate index reloaded");
        Ok(RefreshOutcome::Reloaded { records: count })
    }

    /// Drops all records and forgets the loaded scope.
    pub fn clear(&self) {
        *self.current.write() = Arc::new(IndexSnapshot::default());
    }

    fn is_loaded(&self, scope: &ScopeKey) -> bool {
        self.current.read().scope() == Some(scope)
    }
}

impl std::fmt::Debug for EntityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current.read();
        f.debug_struct("EntityIndex")
            .field("scope", &current.scope())
            .field("records", &current.len())
            .field("reloads", &self.reloads.load(Ordering::Relaxed))
            .finish()
    }
}
