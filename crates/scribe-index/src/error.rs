use scribe_scheduler::Cancelled;

pub type Result<T> = std::result::Result<T, IndexError>;

/// A collaborator query (dataset load, schema lookup) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lookup failed: {message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The document carries no governing-scope marker. This is a normal
    /// quiescent state rather than a failure.
    #[error("no governing scope found in document")]
    ScopeUnavailable,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("index refresh cancelled")]
    Cancelled(#[from] Cancelled),
}
