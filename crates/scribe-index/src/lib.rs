//! Scope-keyed in-memory index of mandate records and label prefix matching.
//!
//! The index holds the mandates of exactly one governing scope at a time. It
//! is published as an immutable [`IndexSnapshot`]; a refresh for a new scope
//! loads the replacement dataset first and then swaps snapshot and scope key
//! together, so readers never observe a half-loaded index.

mod error;
mod index;
mod matcher;
mod record;
mod source;

pub use error::{IndexError, LookupError};
pub use index::{EntityIndex, IndexSnapshot, RefreshOutcome};
pub use matcher::Matcher;
pub use record::EntityRecord;
pub use source::MandateSource;
