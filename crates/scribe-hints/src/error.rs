use scribe_index::LookupError;

/// Failure of a detection run.
///
/// Missing scope, non-applicable regions and superseded runs are not errors;
/// they end the run quietly (see [`RunOutcome`](crate::RunOutcome)).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HintError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
