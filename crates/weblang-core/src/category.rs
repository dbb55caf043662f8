//! Anomaly categories and typed per-category counters.

use schemars::JsonSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A web-language anomaly category.
///
/// The declaration order is the reporting order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum Category {
    /// A punctuation mark repeated, or an irregular run of dots (`!!!`, `....`).
    PunctReps,
    /// A letter written three or more times in a row (`jaaaa`).
    LetterReps,
    /// No space after a punctuation mark (`tere!kuidas`).
    NoSpaces,
    /// Shouting: consecutive tokens written in capitals.
    CapitalLetters,
    /// Letters outside the native alphabet (`c q w x y`).
    ForeignLetters,
    /// The foreign letter `z`.
    ForeignZLetters,
    /// A lowercase word where sentence punctuation expects a capital.
    IgnoredCapital,
    /// Whitespace on both sides of a punctuation mark (`tore ! Mulle`).
    IncorrectSpaces,
    /// Emoticons recognised upstream (`:)`, `:D`).
    Emoticons,
    /// Emoji and flag sequences.
    Emojis,
    /// A clause boundary without the expected comma.
    MissingCommas,
    /// A word the morphological analyser could not lemmatise.
    UnknownWords,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 12;

    /// All categories in reporting order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PunctReps,
        Self::LetterReps,
        Self::NoSpaces,
        Self::CapitalLetters,
        Self::ForeignLetters,
        Self::ForeignZLetters,
        Self::IgnoredCapital,
        Self::IncorrectSpaces,
        Self::Emoticons,
        Self::Emojis,
        Self::MissingCommas,
        Self::UnknownWords,
    ];

    /// Returns the category name as used in output and configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PunctReps => "punct_reps",
            Self::LetterReps => "letter_reps",
            Self::NoSpaces => "no_spaces",
            Self::CapitalLetters => "capital_letters",
            Self::ForeignLetters => "foreign_letters",
            Self::ForeignZLetters => "foreign_z_letters",
            Self::IgnoredCapital => "ignored_capital",
            Self::IncorrectSpaces => "incorrect_spaces",
            Self::Emoticons => "emoticons",
            Self::Emojis => "emojis",
            Self::MissingCommas => "missing_commas",
            Self::UnknownWords => "unknown_words",
        }
    }

    /// Position of the category in [`Category::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` if the category is produced by the pattern vocabulary.
    pub const fn is_pattern(self) -> bool {
        !matches!(
            self,
            Self::Emoticons | Self::Emojis | Self::MissingCommas | Self::UnknownWords
        )
    }

    /// How the category is detected: `"pattern"` or `"heuristic"`.
    pub const fn kind(self) -> &'static str {
        if self.is_pattern() { "pattern" } else { "heuristic" }
    }

    /// A one-line description for listings.
    pub const fn description(self) -> &'static str {
        match self {
            Self::PunctReps => "repeated punctuation or irregular dot runs",
            Self::LetterReps => "a letter written three or more times in a row",
            Self::NoSpaces => "no space after a punctuation mark",
            Self::CapitalLetters => "consecutive words in capitals",
            Self::ForeignLetters => "c, q, w, x or y outside known foreign words",
            Self::ForeignZLetters => "z outside known foreign words",
            Self::IgnoredCapital => "lowercase word after sentence punctuation",
            Self::IncorrectSpaces => "whitespace on both sides of a punctuation mark",
            Self::Emoticons => "emoticons recognised upstream",
            Self::Emojis => "emoji and flag sequences",
            Self::MissingCommas => "clause boundary without a comma",
            Self::UnknownWords => "word the morphological analyser did not recognise",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let available: Vec<&str> = Self::ALL.iter().map(Category::as_str).collect();
                format!("unknown category: {s}. Use: {}", available.join(", "))
            })
    }
}

/// A set of enabled categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySet {
    bits: u16,
}

impl CategorySet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every category.
    pub const fn all() -> Self {
        Self {
            bits: (1 << Category::COUNT) - 1,
        }
    }

    /// Returns `true` if `category` is in the set.
    pub const fn contains(&self, category: Category) -> bool {
        self.bits & (1 << category.index()) != 0
    }

    /// Add a category.
    pub const fn insert(&mut self, category: Category) {
        self.bits |= 1 << category.index();
    }

    /// Remove a category.
    pub const fn remove(&mut self, category: Category) {
        self.bits &= !(1 << category.index());
    }

    /// Returns `true` if no category is enabled.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate over the members in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = Self::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

/// Anomaly counters for one analysis unit.
///
/// Serializes as a flat map holding only the enabled categories plus
/// `word_count`, so disabled categories never appear in output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    enabled: CategorySet,
    counts: [usize; Category::COUNT],
    /// Number of word tokens in the unit.
    pub word_count: usize,
}

impl CategoryCounts {
    /// Zeroed counters for the enabled categories.
    pub const fn new(enabled: CategorySet) -> Self {
        Self {
            enabled,
            counts: [0; Category::COUNT],
            word_count: 0,
        }
    }

    /// Add one to `category`. Disabled categories are ignored.
    pub const fn increment(&mut self, category: Category) {
        if self.enabled.contains(category) {
            self.counts[category.index()] += 1;
        }
    }

    /// Current count for `category` (zero when disabled).
    pub const fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Returns the enabled categories.
    pub const fn enabled(&self) -> CategorySet {
        self.enabled
    }

    /// Sum of all anomaly counters, excluding `word_count`.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Iterate over `(category, count)` for the enabled categories.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        self.enabled.iter().map(|c| (c, self.get(c)))
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let enabled_count = self.enabled.iter().count();
        let mut map = serializer.serialize_map(Some(enabled_count + 1))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.as_str(), &count)?;
        }
        map.serialize_entry("word_count", &self.word_count)?;
        map.end()
    }
}

impl JsonSchema for CategoryCounts {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "CategoryCounts".into()
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "object",
            "description": "Counts per enabled category plus word_count.",
            "additionalProperties": { "type": "integer", "minimum": 0 }
        })
    }
}
