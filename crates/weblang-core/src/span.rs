//! Text spans and offset conversion.
//!
//! Every span in weblang is a half-open `[start, end)` range of Unicode
//! scalar value (character) offsets into one immutable text. The regex
//! engine reports byte offsets, so [`OffsetMap`] translates between the two.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A `[start, end)` range of character offsets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Span {
    /// First character offset (inclusive).
    pub start: usize,
    /// Last character offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of characters covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-width span.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the two spans share an offset.
    ///
    /// Zero-width spans conflict with any span whose range holds their start.
    pub const fn overlaps(&self, other: &Self) -> bool {
        (self.start <= other.start && other.start < self.end)
            || (other.start <= self.start && self.start < other.end)
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Byte/character offset translation for one text.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte offset of every character, plus the text length as a sentinel.
    char_starts: Vec<usize>,
}

impl OffsetMap {
    /// Index the character boundaries of `text`.
    pub fn new(text: &str) -> Self {
        let mut char_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_starts.push(text.len());
        Self { char_starts }
    }

    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.char_starts.len() - 1
    }

    /// Character offset of a byte offset that sits on a character boundary.
    ///
    /// Offsets inside a multi-byte character resolve to that character.
    pub fn to_char(&self, byte: usize) -> usize {
        match self.char_starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset of a character offset, clamped to the text length.
    pub fn to_byte(&self, ch: usize) -> usize {
        self.char_starts[ch.min(self.char_len())]
    }

    /// Character span for a byte range.
    pub fn span(&self, bytes: std::ops::Range<usize>) -> Span {
        Span::new(self.to_char(bytes.start), self.to_char(bytes.end))
    }

    /// Byte range for a character span.
    pub fn byte_range(&self, span: Span) -> std::ops::Range<usize> {
        self.to_byte(span.start)..self.to_byte(span.end)
    }
}
