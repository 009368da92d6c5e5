//! Utilities shared by Scribe tests.
//!
//! In-memory stand-ins for the collaborators of a
//! [`HintSession`](scribe_hints::HintSession), plus small fixture helpers.

mod fakes;
mod fixtures;

pub use fakes::*;
pub use fixtures::*;
