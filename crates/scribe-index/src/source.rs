use async_trait::async_trait;
use scribe_core::ScopeKey;

use crate::{EntityRecord, LookupError};

/// Dataset backing the [`EntityIndex`](crate::EntityIndex).
///
/// Loads may be slow. Only full reloads are required; the index never asks for
/// incremental updates.
#[async_trait]
pub trait MandateSource: Send + Sync {
    async fn load_mandates(&self, scope: &ScopeKey) -> Result<Vec<EntityRecord>, LookupError>;
}
