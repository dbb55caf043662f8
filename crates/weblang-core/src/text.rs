//! Character classes and fallback segmentation.
//!
//! The rule vocabulary works over the Estonian alphabet rather than Unicode
//! letter classes, so the classes are spelled out here once, both as regex
//! class fragments and as predicates for the hand-written scanners.
//!
//! [`plain_document`] builds a [`Document`] from raw text when no upstream
//! layers are available: whitespace word tokens and blank-line paragraphs.

use crate::layers::{Document, WordToken};
use crate::span::Span;

/// Lowercase letters, as a regex class fragment.
pub const LOWERCASE: &str = "a-zšžõäöü";

/// Uppercase letters, as a regex class fragment.
pub const UPPERCASE: &str = "A-ZŠŽÕÄÖÜ";

/// Digits, as a regex class fragment.
pub const NUMERIC: &str = "0-9";

/// Returns `true` for a lowercase letter of the alphabet.
pub const fn is_lower(c: char) -> bool {
    matches!(c, 'a'..='z' | 'š' | 'ž' | 'õ' | 'ä' | 'ö' | 'ü')
}

/// Returns `true` for an uppercase letter of the alphabet.
pub const fn is_upper(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'Š' | 'Ž' | 'Õ' | 'Ä' | 'Ö' | 'Ü')
}

/// Returns `true` for a letter of the alphabet.
pub const fn is_letter(c: char) -> bool {
    is_lower(c) || is_upper(c)
}

/// Returns `true` for a letter of the alphabet or an ASCII digit.
pub const fn is_alphanum(c: char) -> bool {
    is_letter(c) || c.is_ascii_digit()
}

/// Expand `{LOWERCASE}`, `{UPPERCASE}`, `{NUMERIC}`, `{LETTERS}` and
/// `{ALPHANUM}` placeholders in a pattern template.
pub fn expand_classes(template: &str) -> String {
    let letters = format!("{LOWERCASE}{UPPERCASE}");
    let alphanum = format!("{letters}{NUMERIC}");
    template
        .replace("{LETTERS}", &letters)
        .replace("{ALPHANUM}", &alphanum)
        .replace("{LOWERCASE}", LOWERCASE)
        .replace("{UPPERCASE}", UPPERCASE)
        .replace("{NUMERIC}", NUMERIC)
}

/// Split text into whitespace-delimited word tokens with character offsets.
///
/// Leading and trailing punctuation is split off into tokens of its own,
/// so `tere!` yields `tere` and `!`.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_words(text: &str) -> Vec<WordToken> {
    let mut words = Vec::new();
    let mut current: Vec<char> = Vec::new();
    let mut start = 0;

    let chars: Vec<char> = text.chars().collect();
    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_whitespace() {
            push_chunk(&mut words, &current, start);
            current.clear();
        } else {
            if current.is_empty() {
                start = idx;
            }
            current.push(ch);
        }
    }
    push_chunk(&mut words, &current, start);

    words
}

/// Push a whitespace-delimited chunk, separating edge punctuation.
fn push_chunk(words: &mut Vec<WordToken>, chunk: &[char], start: usize) {
    if chunk.is_empty() {
        return;
    }

    let lead = chunk.iter().take_while(|c| !c.is_alphanumeric()).count();
    if lead == chunk.len() {
        words.push(token(chunk, start));
        return;
    }
    let trail = chunk.iter().rev().take_while(|c| !c.is_alphanumeric()).count();

    if lead > 0 {
        words.push(token(&chunk[..lead], start));
    }
    let core_end = chunk.len() - trail;
    words.push(token(&chunk[lead..core_end], start + lead));
    if trail > 0 {
        words.push(token(&chunk[core_end..], start + core_end));
    }
}

fn token(chars: &[char], start: usize) -> WordToken {
    WordToken {
        start,
        end: start + chars.len(),
        text: chars.iter().collect(),
    }
}

/// Split text into paragraphs (separated by blank lines), with character offsets.
///
/// Each span is trimmed of surrounding whitespace; empty paragraphs are dropped.
pub fn split_paragraphs(text: &str) -> Vec<Span> {
    let chars: Vec<char> = text.chars().collect();
    let mut paragraphs = Vec::new();
    let mut para_start: Option<usize> = None;
    let mut last_content = 0;
    let mut newlines = 0;

    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            newlines += 1;
            if newlines >= 2
                && let Some(start) = para_start.take()
            {
                paragraphs.push(Span::new(start, last_content));
            }
        } else if !ch.is_whitespace() {
            newlines = 0;
            if para_start.is_none() {
                para_start = Some(idx);
            }
            last_content = idx + 1;
        }
    }
    if let Some(start) = para_start {
        paragraphs.push(Span::new(start, last_content));
    }

    paragraphs
}

/// Build a document from raw text using the fallback segmentation.
///
/// Only the words and paragraphs layers are filled in; clause and morph
/// layers stay absent.
pub fn plain_document(text: &str) -> Document {
    Document {
        words: split_words(text),
        paragraphs: Some(split_paragraphs(text)),
        ..Document::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_predicates() {
        assert!(is_lower('õ'));
        assert!(is_upper('Ž'));
        assert!(is_letter('ü'));
        assert!(!is_letter('é'));
        assert!(is_alphanum('7'));
        assert!(!is_alphanum('!'));
    }

    #[test]
    fn expand_classes_replaces_placeholders() {
        let expanded = expand_classes("[{LETTERS}][{NUMERIC}]");
        assert_eq!(expanded, "[a-zšžõäöüA-ZŠŽÕÄÖÜ][0-9]");
        assert_eq!(
            expand_classes("[^{ALPHANUM}]"),
            "[^a-zšžõäöüA-ZŠŽÕÄÖÜ0-9]"
        );
    }

    #[test]
    fn split_words_separates_edge_punctuation() {
        let words = split_words("Tere, õun!");
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Tere", ",", "õun", "!"]);
        assert_eq!(words[2].start, 6);
        assert_eq!(words[2].end, 9);
    }

    #[test]
    fn split_words_keeps_inner_punctuation() {
        let words = split_words("tere!kuidas läheb");
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["tere!kuidas", "läheb"]);
    }

    #[test]
    fn split_words_punctuation_only_chunk() {
        let words = split_words("jah ?!?");
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "?!?");
        assert_eq!(words[1].start, 4);
    }

    #[test]
    fn split_words_empty_input() {
        assert!(split_words("").is_empty());
        assert!(split_words("   \n ").is_empty());
    }

    #[test]
    fn split_paragraphs_basic() {
        let text = "Esimene lõik.\n\nTeine lõik.\n \nKolmas.";
        let paras = split_paragraphs(text);
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[0], Span::new(0, 13));
        let chars: Vec<char> = text.chars().collect();
        let second: String = chars[paras[1].start..paras[1].end].iter().collect();
        assert_eq!(second, "Teine lõik.");
    }

    #[test]
    fn single_newline_does_not_split() {
        assert_eq!(split_paragraphs("rida üks\nrida kaks").len(), 1);
    }

    #[test]
    fn plain_document_fills_words_and_paragraphs() {
        let doc = plain_document("tere\n\nhead aega");
        assert_eq!(doc.words.len(), 3);
        assert_eq!(doc.paragraphs.as_ref().map(Vec::len), Some(2));
        assert!(doc.clauses.is_none());
        assert!(doc.morph.is_none());
    }
}
