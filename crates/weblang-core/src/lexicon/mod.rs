//! Word lists and code-point tables the engine consults.
//!
//! Everything here is loaded once when the engine is built. Built-in
//! defaults cover every list; configuration can point any of them at a file.

pub mod emoji;
pub mod words;

use std::collections::HashSet;
use std::sync::LazyLock;

pub use emoji::{EmojiSet, is_regional_indicator};
pub use words::{CommaExclusions, PivotRule, load_word_list};

use crate::config::LexiconConfig;
use crate::error::ConfigResult;

/// Loanwords and brand names that may contain `c q w x y` without being
/// reported as `foreign_letters`.
pub static FOREIGN_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "wifi", "www", "e-mail", "email", "facebook", "youtube", "twitter", "instagram",
        "iphone", "ipad", "windows", "xbox", "playstation", "skype", "whatsapp", "linkedin",
        "tiktok", "snapchat", "show", "cool", "city", "party", "hobby", "sexy", "jeans", "body",
        "cocktail", "coca-cola", "pepsi-cola", "taxi", "wc", "cv", "ok", "okay", "by",
    ]
    .into_iter()
    .collect()
});

/// The loaded lexicon.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Lowercased foreign-letter allow-list.
    pub foreign_words: HashSet<String>,
    /// Lowercased `z` allow-list.
    pub z_words: HashSet<String>,
    /// Emoji code points.
    pub emoji: EmojiSet,
    /// Missing-comma exclusion table.
    pub comma: CommaExclusions,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            foreign_words: FOREIGN_WORDS.iter().map(|w| (*w).to_string()).collect(),
            z_words: words::Z_WORDS.iter().map(|w| (*w).to_string()).collect(),
            emoji: EmojiSet::default(),
            comma: CommaExclusions::default(),
        }
    }
}

impl Lexicon {
    /// Build the lexicon from configuration, reading any configured files.
    ///
    /// A configured file replaces the built-in list rather than extending it.
    #[tracing::instrument(skip_all)]
    pub fn load(config: &LexiconConfig) -> ConfigResult<Self> {
        let mut lexicon = Self::default();

        if let Some(ref path) = config.foreign_words_file {
            lexicon.foreign_words = load_word_list(path)?;
        }
        if let Some(ref path) = config.z_words_file {
            lexicon.z_words = load_word_list(path)?;
        }
        if let Some(ref path) = config.emoji_table_file {
            lexicon.emoji = EmojiSet::load(path)?;
        }
        if config.comma_trailing_words.is_some() || config.comma_pivots.is_some() {
            let trailing: Vec<&str> = match config.comma_trailing_words {
                Some(ref list) => list.iter().map(String::as_str).collect(),
                None => words::COMMA_TRAILING_WORDS.to_vec(),
            };
            let pivots = config
                .comma_pivots
                .clone()
                .unwrap_or_else(CommaExclusions::default_pivots);
            lexicon.comma = CommaExclusions::new(&trailing, &pivots);
        }

        tracing::debug!(
            foreign_words = lexicon.foreign_words.len(),
            z_words = lexicon.z_words.len(),
            trailing_words = lexicon.comma.trailing_words.len(),
            pivots = lexicon.comma.pivots.len(),
            "lexicon ready"
        );
        Ok(lexicon)
    }

    /// Returns `true` if `token` is on the foreign-letter allow-list.
    pub fn is_foreign_word(&self, token: &str) -> bool {
        contains_folded(&self.foreign_words, token)
    }

    /// Returns `true` if `token` is on the `z` allow-list.
    pub fn is_z_word(&self, token: &str) -> bool {
        contains_folded(&self.z_words, token)
    }
}

/// Case-insensitive lookup of a token, also trying it without edge punctuation.
fn contains_folded(set: &HashSet<String>, token: &str) -> bool {
    let lower = token.to_lowercase();
    if set.contains(&lower) {
        return true;
    }
    let trimmed = lower.trim_matches(|c: char| !c.is_alphanumeric());
    !trimmed.is_empty() && set.contains(trimmed)
}
