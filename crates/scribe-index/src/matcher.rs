use std::sync::Arc;

use scribe_fuzzy::PrefixMatcher;

use crate::{EntityRecord, IndexSnapshot};

/// Looks up entities whose label starts with a query, ignoring case.
pub trait Matcher {
    /// Returns matches in index order. An empty query matches nothing.
    fn find_by_prefix(&self, query: &str) -> Vec<Arc<EntityRecord>>;
}

impl Matcher for IndexSnapshot {
    fn find_by_prefix(&self, query: &str) -> Vec<Arc<EntityRecord>> {
        let matcher = PrefixMatcher::new(query);
        let Some(first) = matcher.first_char() else {
            return Vec::new();
        };
        let Some(bucket) = self.buckets.get(&first) else {
            return Vec::new();
        };

        bucket
            .iter()
            .filter(|&&idx| matcher.matches_folded(&self.folded_labels[idx as usize]))
            .map(|&idx| Arc::clone(self.record_at(idx)))
            .collect()
    }
}
