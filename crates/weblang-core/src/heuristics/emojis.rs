//! Emoji and emoticon annotations.

use unicode_segmentation::UnicodeSegmentation;

use crate::category::Category;
use crate::layers::{CompoundToken, TokenKind};
use crate::lexicon::{EmojiSet, is_regional_indicator};
use crate::report::Annotation;
use crate::span::Span;

/// Find emojis in one pass over extended grapheme clusters.
///
/// A cluster is one emoji when any of its code points is in `emoji` or is a
/// regional indicator, so skin-tone, ZWJ and flag sequences count once.
/// Offsets come straight from the scan.
pub fn find_emojis(text: &str, emoji: &EmojiSet) -> Vec<Annotation> {
    let mut found = Vec::new();
    let mut offset = 0;

    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if grapheme
            .chars()
            .any(|c| emoji.contains(c) || is_regional_indicator(c))
        {
            found.push(Annotation::new(Span::new(offset, offset + len), Category::Emojis));
        }
        offset += len;
    }

    found
}

/// Re-emit emoticon compound tokens as `emoticons` annotations.
pub fn emoticons(compound_tokens: &[CompoundToken]) -> Vec<Annotation> {
    compound_tokens
        .iter()
        .filter(|t| t.has_kind(TokenKind::Emoticon))
        .map(|t| Annotation::new(t.span(), Category::Emoticons))
        .collect()
}
