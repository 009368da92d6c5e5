//! Text model primitives: sizes, ranges and document regions.
//!
//! All offsets are byte offsets into UTF-8 text.

use serde::{Deserialize, Serialize};

pub use text_size::{TextRange, TextSize};

/// Absolute location of a text snippet within the full document.
///
/// Regions are handed to us by the editor alongside the snippet text. Locations
/// produced while scanning the snippet are relative to it and are mapped back
/// into the document with [`Region::normalize`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(TextRange);

impl Region {
    /// Panics if `end < start`.
    #[inline]
    pub fn new(start: impl Into<TextSize>, end: impl Into<TextSize>) -> Self {
        Self(TextRange::new(start.into(), end.into()))
    }

    #[inline]
    pub fn at(start: impl Into<TextSize>, len: impl Into<TextSize>) -> Self {
        Self(TextRange::at(start.into(), len.into()))
    }

    #[inline]
    pub fn start(self) -> TextSize {
        self.0.start()
    }

    #[inline]
    pub fn end(self) -> TextSize {
        self.0.end()
    }

    #[inline]
    pub fn len(self) -> TextSize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn range(self) -> TextRange {
        self.0
    }

    /// Maps a snippet-relative location to an absolute document location.
    ///
    /// Only the region start participates; callers that need the result to stay
    /// inside the region check it with [`Region::contains_range`]. Returns
    /// `None` if the absolute location is not representable.
    #[inline]
    pub fn normalize(self, location: TextRange) -> Option<TextRange> {
        location.checked_add(self.start())
    }

    /// Returns `true` if the absolute `range` lies within this region.
    #[inline]
    pub fn contains_range(self, range: TextRange) -> bool {
        self.0.contains_range(range)
    }
}

impl From<TextRange> for Region {
    fn from(range: TextRange) -> Self {
        Self(range)
    }
}

impl From<Region> for TextRange {
    fn from(region: Region) -> Self {
        region.0
    }
}
