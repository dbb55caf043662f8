//! Layer-driven heuristics.
//!
//! These categories are not found by pattern matching over the text. They
//! read the upstream layers instead: clause segmentations for missing commas,
//! morphological analysis for unknown words, compound tokens for emoticons
//! and grapheme clusters for emojis.
//!
//! Each heuristic is a pure function returning annotations. None of them goes
//! through the protected-span filter.

pub mod emojis;
pub mod missing_commas;
pub mod unknown_words;

pub use emojis::{emoticons, find_emojis};
pub use missing_commas::missing_commas;
pub use unknown_words::unknown_words;
