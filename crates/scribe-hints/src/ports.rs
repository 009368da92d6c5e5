//! Interfaces to the editor and the data layer.

use async_trait::async_trait;
use scribe_core::{OwnerId, Region, RunId, ScopeKey, TextRange};
use scribe_index::LookupError;
use serde::{Deserialize, Serialize};

use crate::HintCard;

/// A schema property whose range is the hinted class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Property {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Schema metadata queries.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Properties of `source_type` whose range is `target_range`.
    async fn find_applicable_properties(
        &self,
        source_type: &str,
        target_range: &str,
    ) -> Result<Vec<Property>, LookupError>;
}

/// Reads the governing-scope marker from the current document.
pub trait ScopeSource: Send + Sync {
    /// The resource the first node carrying `property` points at, if any.
    fn current_scope_marker(&self, property: &str) -> Option<ScopeKey>;
}

/// The editor's registry of displayed hints.
///
/// Every mutation names the owner; a producer only ever touches its own hints.
pub trait HintRegistry: Send + Sync {
    fn remove_hints_in_region(&self, region: Region, run_id: &RunId, owner: &OwnerId);

    fn remove_hints_at_location(&self, location: TextRange, run_id: &RunId, owner: &OwnerId);

    fn add_hints(&self, run_id: &RunId, owner: &OwnerId, cards: Vec<HintCard>);

    /// Maps a location recorded during run `run_id` onto the current document.
    ///
    /// Registries that do not track edits can keep the default.
    fn update_location_to_current_index(&self, _run_id: &RunId, location: TextRange) -> TextRange {
        location
    }
}
