//! Built-in word lists and the word-list file loader.

use std::collections::HashSet;
use std::sync::LazyLock;

use camino::Utf8Path;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Dictionary words that legitimately contain the letter `z`.
///
/// A token from this set is not reported as `foreign_z_letters`.
pub static Z_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "zooloog", "zooloogia", "zooloogiline", "zoo", "zebra", "zeebra", "zen", "zeniit",
        "zeppeliin", "zombi", "zuulu", "jazz", "džäss", "pizza", "mozzarella", "paparazzo",
        "paparazzi", "ozoon", "bronze", "zumba", "zloti", "zirkoon", "zigzag", "mezzo",
        "mezzosopran", "intermezzo", "scherzo", "pizzicato", "zen-budism", "zoom",
    ]
    .into_iter()
    .collect()
});

/// Clause-final words after which a relaxed clause boundary is not a
/// missing comma (conjunctions, particles and the politeness marker).
pub const COMMA_TRAILING_WORDS: &[&str] = &[
    "ainult",
    "vaevalt",
    "peaasi",
    "mitte",
    "ilma",
    "olgugi",
    "nii",
    "sellepärast",
    "selleks",
    "et",
    "sest",
    "aga",
    "kuid",
    "vaid",
    "siis",
    "ja",
    "ning",
    "ega",
    "ehk",
    "või",
    "palun",
];

/// Clause-final words that, followed by a clause starting with `kui`,
/// make the boundary a non-candidate.
pub const KUI_TRIGGERS: &[&str] = &["juhul", "enne", "isegi", "siis"];

/// A pivot override in the missing-comma exclusion table.
///
/// When the clause before a candidate ends with one of `triggers` and the
/// clause at the candidate starts with `word`, the candidate is suppressed.
/// Any pivot word at the start of the following clause also lifts the
/// plain trailing-word suppression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PivotRule {
    /// First word of the clause starting at the candidate.
    pub word: String,
    /// Last words of the preceding clause that trigger the override.
    #[serde(default)]
    pub triggers: Vec<String>,
}

/// Exclusion data for the missing-comma heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommaExclusions {
    /// Lowercased non-suitable trailing words.
    pub trailing_words: HashSet<String>,
    /// Pivot overrides, with lowercased words.
    pub pivots: Vec<PivotRule>,
}

impl CommaExclusions {
    /// Build the table, lowercasing every word.
    pub fn new<S: AsRef<str>>(trailing_words: &[S], pivots: &[PivotRule]) -> Self {
        Self {
            trailing_words: trailing_words
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            pivots: pivots
                .iter()
                .map(|p| PivotRule {
                    word: p.word.to_lowercase(),
                    triggers: p.triggers.iter().map(|t| t.to_lowercase()).collect(),
                })
                .collect(),
        }
    }

    /// An empty table: nothing is excluded.
    pub fn none() -> Self {
        Self {
            trailing_words: HashSet::new(),
            pivots: Vec::new(),
        }
    }

    /// The default pivots: `et` after any trailing word, `kui` after
    /// [`KUI_TRIGGERS`].
    pub fn default_pivots() -> Vec<PivotRule> {
        vec![
            PivotRule {
                word: "et".to_string(),
                triggers: COMMA_TRAILING_WORDS.iter().map(|w| (*w).to_string()).collect(),
            },
            PivotRule {
                word: "kui".to_string(),
                triggers: KUI_TRIGGERS.iter().map(|w| (*w).to_string()).collect(),
            },
        ]
    }

    /// Returns `true` if `word` starts a pivot override.
    pub fn is_pivot(&self, word: &str) -> bool {
        self.pivots.iter().any(|p| p.word == word)
    }
}

impl Default for CommaExclusions {
    fn default() -> Self {
        Self::new(COMMA_TRAILING_WORDS, &Self::default_pivots())
    }
}

/// Load a word list: one word per line, blank lines and `#` comments skipped.
///
/// Words are lowercased.
pub fn load_word_list(path: &Utf8Path) -> ConfigResult<HashSet<String>> {
    let content =
        std::fs::read_to_string(path.as_std_path()).map_err(|e| ConfigError::LexiconFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    let words: HashSet<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();
    tracing::debug!(%path, count = words.len(), "loaded word list");
    Ok(words)
}
