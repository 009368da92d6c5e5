use serde::{Deserialize, Serialize};

/// A mandate: a position within a governing body, filled by one or more
/// office-holders.
///
/// `label` is the label of the role the mandate fills (e.g. "Schepen"), which
/// is what users type in running text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub label: String,
    /// Identifier of the role record the mandate refers to.
    pub role_id: String,
    pub uri: String,
    /// Number of seats for this mandate, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_count: Option<u32>,
}

impl EntityRecord {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        role_id: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            role_id: role_id.into(),
            uri: uri.into(),
            holder_count: None,
        }
    }

    pub fn with_holder_count(mut self, holder_count: u32) -> Self {
        self.holder_count = Some(holder_count);
        self
    }
}
