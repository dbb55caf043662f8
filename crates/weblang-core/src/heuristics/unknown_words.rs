//! Unknown-word detection from morphological analysis.

use crate::category::Category;
use crate::layers::{CompoundToken, MorphToken, TokenKind};
use crate::report::Annotation;

/// Flag the morph tokens the analyser could not lemmatise.
///
/// A token counts once when all of these hold:
/// - its lemma is absent;
/// - its text has at least one letter or digit;
/// - its text does not start with an uppercase letter (abbreviations,
///   acronyms and names are left alone);
/// - no emoticon or name-with-initial compound token covers it or has it
///   as its normalized text.
#[tracing::instrument(skip_all, fields(tokens = morph.len()))]
pub fn unknown_words(morph: &[MorphToken], compound_tokens: &[CompoundToken]) -> Vec<Annotation> {
    let exempt: Vec<&CompoundToken> = compound_tokens
        .iter()
        .filter(|t| t.has_kind(TokenKind::Emoticon) || t.has_kind(TokenKind::NameWithInitial))
        .collect();

    let found: Vec<Annotation> = morph
        .iter()
        .filter(|m| m.lemma.is_none())
        .filter(|m| m.text.chars().any(char::is_alphanumeric))
        .filter(|m| !m.has_capital_prefix())
        .filter(|m| {
            !exempt.iter().any(|t| {
                t.span().contains(&m.span()) || t.normalized.as_deref() == Some(m.text.as_str())
            })
        })
        .map(|m| Annotation::new(m.span(), Category::UnknownWords))
        .collect();

    tracing::debug!(found = found.len(), "unknown words");
    found
}
