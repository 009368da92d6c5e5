//! Mandate hint detection.
//!
//! A [`HintOrchestrator`] reacts to document-change [`Trigger`]s: it makes sure
//! the entity index matches the document's governing scope, waits out a short
//! debounce, tokenizes every changed snippet, matches tokens against mandate
//! labels, keeps only the most specific overlapping spans and hands the
//! resulting [`HintCard`]s to the editor's [`HintRegistry`].
//!
//! Runs are restartable: a new trigger cancels the run in flight, and changes
//! caused by this producer itself are ignored.

mod context;
mod detect;
mod error;
mod hint;
mod orchestrator;
mod overlap;
mod ports;
mod session;
mod tokenize;

pub use context::{SnippetContext, Trigger, Triple, RDF_TYPE};
pub use detect::detect_hints;
pub use error::HintError;
pub use hint::{HintCandidate, HintCard, Retraction};
pub use orchestrator::{HintOrchestrator, QuiescentReason, RunOutcome, RunState};
pub use overlap::{resolve_overlaps, Located};
pub use ports::{HintRegistry, Property, SchemaSource, ScopeSource};
pub use session::{Collaborators, HintSession};
pub use tokenize::{Token, Tokenizer, WordTokenizer};
