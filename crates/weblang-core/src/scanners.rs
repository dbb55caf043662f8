//! Hand-written matchers for rules a plain regex cannot express.
//!
//! Repetition of "the same character" needs a backreference and the
//! foreign-letter rules need a lookahead, neither of which the `regex` crate
//! supports. Each scanner returns byte ranges into the text, left to right
//! and non-overlapping, exactly as a leftmost-first regex scan would.

use std::ops::Range;

use crate::text::{is_alphanum, is_letter, is_upper};

/// Runs of two or more identical punctuation or symbol characters.
///
/// Letters, digits, dots, spaces and newlines never start a run; dots have a
/// rule of their own.
pub fn punct_runs(text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut run: Option<(char, usize, usize)> = None; // (char, start byte, length)

    for (idx, ch) in text.char_indices() {
        if let Some((prev, start, len)) = run {
            if ch == prev {
                run = Some((prev, start, len + 1));
                continue;
            }
            if len >= 2 {
                found.push(start..idx);
            }
            run = None;
        }
        if !matches!(ch, '\n' | '.' | ' ') && !is_alphanum(ch) {
            run = Some((ch, idx, 1));
        }
    }
    if let Some((_, start, len)) = run
        && len >= 2
    {
        found.push(start..text.len());
    }

    found
}

/// Tokens with a letter written three or more times in a row.
///
/// The repetition must come before any digit in the token. The match starts
/// at the token start and runs to the token end or the first `? , . ) !`
/// after the repetition.
pub fn letter_reps(text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();

    for (start, token) in whitespace_tokens(text) {
        let chars: Vec<(usize, char)> = token.char_indices().collect();
        let digit_at = chars
            .iter()
            .position(|(_, c)| c.is_ascii_digit())
            .unwrap_or(chars.len());

        let anchor = (0..digit_at).rev().find(|&i| {
            i + 2 < chars.len()
                && is_letter(chars[i].1)
                && chars[i + 1].1 == chars[i].1
                && chars[i + 2].1 == chars[i].1
        });
        let Some(anchor) = anchor else {
            continue;
        };

        let end = chars[anchor + 3..]
            .iter()
            .find(|(_, c)| matches!(c, '?' | ',' | '.' | ')' | '!'))
            .map_or(token.len(), |(offset, _)| *offset);
        found.push(start..start + end);
    }

    found
}

/// Tokens where one of `c q w x y` occurs before any uppercase letter.
pub fn foreign_letters(text: &str) -> Vec<Range<usize>> {
    tokens_with_leading(text, |c| matches!(c, 'c' | 'q' | 'w' | 'x' | 'y'))
}

/// Tokens where `z` occurs before any uppercase letter.
pub fn foreign_z_letters(text: &str) -> Vec<Range<usize>> {
    tokens_with_leading(text, |c| c == 'z')
}

/// Tokens in which a `target` letter appears before the first uppercase letter.
fn tokens_with_leading(text: &str, target: impl Fn(char) -> bool) -> Vec<Range<usize>> {
    whitespace_tokens(text)
        .into_iter()
        .filter(|(_, token)| {
            token
                .chars()
                .find(|&c| is_upper(c) || target(c))
                .is_some_and(&target)
        })
        .map(|(start, token)| start..start + token.len())
        .collect()
}

/// Whitespace-delimited tokens with their starting byte offsets.
fn whitespace_tokens(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, &text[s..idx]));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        tokens.push((s, &text[s..]));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slices<'a>(text: &'a str, ranges: &[Range<usize>]) -> Vec<&'a str> {
        ranges.iter().map(|r| &text[r.clone()]).collect()
    }

    #[test]
    fn punct_runs_finds_maximal_runs() {
        let text = "tere!!!!kuidas läheb????";
        assert_eq!(slices(text, &punct_runs(text)), vec!["!!!!", "????"]);
    }

    #[test]
    fn punct_runs_ignores_dots_and_mixed_marks() {
        let text = "jah... ei?! hmm--";
        assert_eq!(slices(text, &punct_runs(text)), vec!["--"]);
    }

    #[test]
    fn punct_runs_ignores_letters_and_spaces() {
        assert!(punct_runs("jaaa  ei").is_empty());
    }

    #[test]
    fn punct_runs_includes_repeated_emoji() {
        let text = "😀😀 tore";
        assert_eq!(slices(text, &punct_runs(text)), vec!["😀😀"]);
    }

    #[test]
    fn letter_reps_runs_to_delimiter() {
        let text = "jaaaa! väga häääästi";
        assert_eq!(slices(text, &letter_reps(text)), vec!["jaaaa", "häääästi"]);
    }

    #[test]
    fn letter_reps_uses_rightmost_repetition() {
        let text = "jaaa!nooooo";
        assert_eq!(slices(text, &letter_reps(text)), vec!["jaaa!nooooo"]);
    }

    #[test]
    fn letter_reps_rejects_digit_before_repetition() {
        assert!(letter_reps("2aaa").is_empty());
        let text = "aaa2";
        assert_eq!(slices(text, &letter_reps(text)), vec!["aaa2"]);
    }

    #[test]
    fn letter_reps_needs_three() {
        assert!(letter_reps("jaa saal").is_empty());
    }

    #[test]
    fn foreign_letters_marks_whole_token() {
        let text = "ma ei viici yksi";
        assert_eq!(slices(text, &foreign_letters(text)), vec!["viici", "yksi"]);
    }

    #[test]
    fn foreign_letters_requires_lowercase_before_capitals() {
        assert!(foreign_letters("Cyprus").is_empty());
        assert!(foreign_letters("aCy").is_empty());
        let text = "xA";
        assert_eq!(slices(text, &foreign_letters(text)), vec!["xA"]);
    }

    #[test]
    fn foreign_z_letters_finds_z() {
        let text = "plz aita";
        assert_eq!(slices(text, &foreign_z_letters(text)), vec!["plz"]);
    }

    #[test]
    fn whitespace_tokens_offsets() {
        let tokens = whitespace_tokens("  õun\tja\n");
        assert_eq!(tokens, vec![(2, "õun"), (7, "ja")]);
    }
}
