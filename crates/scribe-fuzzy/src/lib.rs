//! Case-insensitive prefix matching used to look up entity labels.
//!
//! Labels are folded once when they enter the entity index and queries are
//! folded once per token, so matching itself is a plain byte-prefix test over
//! folded strings.
//!
//! ## Unicode support (`feature = "unicode"`)
//!
//! ASCII input always takes a fast path that only folds `A-Z`. For non-ASCII
//! input the default build uses `str::to_lowercase`. With the `unicode`
//! feature both sides are normalized with Unicode **NFKC** and then **case
//! folded**, so matches like `"strasse"` ⇔ `"Straße"` and composed/decomposed
//! accents behave as users expect.

#![forbid(unsafe_code)]

mod folding;

use std::borrow::Cow;

pub use folding::{first_folded_char, fold_case};

/// Case-insensitive prefix match.
///
/// An empty query is a prefix of everything; callers that treat an empty query
/// as "no match" must check for it themselves.
#[inline]
pub fn prefix_match(query: &str, candidate: &str) -> bool {
    PrefixMatcher::new(query).matches(candidate)
}

/// A query folded once and reused against many candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    folded: String,
}

impl PrefixMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            folded: fold_case(query).into_owned(),
        }
    }

    /// The folded query.
    pub fn query(&self) -> &str {
        &self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// First character of the folded query, used to pick a prefix bucket.
    pub fn first_char(&self) -> Option<char> {
        self.folded.chars().next()
    }

    /// Matches a raw candidate, folding it first.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate: Cow<'_, str> = fold_case(candidate);
        self.matches_folded(&candidate)
    }

    /// Matches a candidate that has already been folded with [`fold_case`].
    #[inline]
    pub fn matches_folded(&self, folded_candidate: &str) -> bool {
        folded_candidate.starts_with(self.folded.as_str())
    }
}
