//! Core shared types for Scribe.
//!
//! This crate is intentionally small: text offsets and regions, plus the
//! identities that tie emitted hints to their owner and to the editor event
//! that produced them.

mod ids;
mod text;

pub use ids::{Originator, OwnerId, RunId, ScopeKey};
pub use text::{Region, TextRange, TextSize};
