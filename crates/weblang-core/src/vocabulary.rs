//! Pattern vocabulary and matcher.
//!
//! The vocabulary is an ordered table of rules. Each rule has a matcher, an
//! optional validator and the category it reports. Every rule scans the whole
//! text on its own (leftmost-first, non-overlapping within the rule); matches
//! from different rules may overlap and are all kept.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategorySet};
use crate::config::PatternRuleConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::lexicon::{Lexicon, is_regional_indicator};
use crate::report::Annotation;
use crate::scanners;
use crate::span::OffsetMap;
use crate::text::expand_classes;

fn class_regex(template: &str) -> Regex {
    Regex::new(&expand_classes(template)).expect("valid regex")
}

/// Four or more dots, or exactly two dots between non-dots.
static DOT_RUNS: LazyLock<Regex> = LazyLock::new(|| class_regex(r"\.{4,}|[^.]\.\.[^.]"));

/// Two letter runs joined by punctuation without a space.
static NO_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    class_regex(r"[{LETTERS}]{2,}[^\s{ALPHANUM}ôÔ\-_/'*]+[{LETTERS}]{2,}")
});

/// A capitalised token followed by more capitalised material.
static CAPITAL_LETTERS: LazyLock<Regex> = LazyLock::new(|| {
    class_regex(
        r"(?:\s|^)([{UPPERCASE}]{2,}[^{LOWERCASE}\-]+[{UPPERCASE} ,.!?]+(?:\s|[,.!?]+)[{UPPERCASE}][^ ]*)",
    )
});

/// Sentence punctuation followed by a lowercase word.
static IGNORED_CAPITAL: LazyLock<Regex> = LazyLock::new(|| {
    class_regex(r"[^{NUMERIC}.](?:[!?.]{1,2}|[!?.]{4,})\s*[{LOWERCASE}]+\s")
});

/// A punctuation mark with whitespace on both sides.
static INCORRECT_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    class_regex(r"[{ALPHANUM}]+\s[^{ALPHANUM}\n …\&§\-–‒—+=•]\s[{ALPHANUM}]+")
});

/// A domain suffix ending the match or followed by a non-alphanumeric.
static DOMAIN_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| class_regex(r"(?:\.ee|\.com|\.ru)(?:$|[^{ALPHANUM}])"));

/// A built-in match validator.
///
/// A validator returning `false` discards the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Reject matches containing an emoji or regional-indicator code point.
    NoEmoji,
    /// Reject matches containing `.ee`, `.com` or `.ru` as a domain suffix.
    NoDomain,
    /// Reject tokens on the foreign-letter allow-list.
    ForeignWords,
    /// Reject tokens on the `z` allow-list.
    ZWords,
}

impl Validator {
    /// Returns `true` if the match is kept.
    pub fn accepts(self, matched: &str, lexicon: &Lexicon) -> bool {
        match self {
            Self::NoEmoji => !matched
                .chars()
                .any(|c| lexicon.emoji.contains(c) || is_regional_indicator(c)),
            Self::NoDomain => !DOMAIN_SUFFIX.is_match(matched),
            Self::ForeignWords => !lexicon.is_foreign_word(matched),
            Self::ZWords => !lexicon.is_z_word(matched),
        }
    }
}

/// A scanner function returning byte ranges.
pub type ScanFn = fn(&str) -> Vec<Range<usize>>;

/// How a rule finds matches.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// A regular expression; the span is the given capture group.
    Pattern {
        /// Compiled expression.
        regex: Regex,
        /// Capture group giving the span (0 = whole match).
        group: usize,
    },
    /// A hand-written scanner.
    Scan(ScanFn),
}

impl Matcher {
    /// All non-empty match ranges, as byte offsets.
    fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        match self {
            Self::Pattern { regex, group } => regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(*group))
                .map(|m| m.range())
                .filter(|r| !r.is_empty())
                .collect(),
            Self::Scan(scan) => scan(text),
        }
    }
}

/// One vocabulary entry.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Category reported for each match.
    pub category: Category,
    /// Match finder.
    pub matcher: Matcher,
    /// Optional validator applied to each match.
    pub validator: Option<Validator>,
}

impl PatternRule {
    /// A rule over a regular expression.
    pub const fn pattern(category: Category, regex: Regex, group: usize) -> Self {
        Self {
            category,
            matcher: Matcher::Pattern { regex, group },
            validator: None,
        }
    }

    /// A rule over a scanner.
    pub const fn scan(category: Category, scan: ScanFn) -> Self {
        Self {
            category,
            matcher: Matcher::Scan(scan),
            validator: None,
        }
    }

    /// Attach a validator.
    #[must_use]
    pub const fn validated(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Compile a rule from configuration.
    ///
    /// Class placeholders are expanded before compiling. The capture group
    /// must exist in the pattern.
    pub fn from_config(config: &PatternRuleConfig) -> ConfigResult<Self> {
        let expanded = expand_classes(&config.pattern);
        let regex = Regex::new(&expanded).map_err(|e| ConfigError::InvalidPattern {
            category: config.category,
            pattern: config.pattern.clone(),
            source: Box::new(e),
        })?;
        if config.group >= regex.captures_len() {
            return Err(ConfigError::MissingGroup {
                pattern: config.pattern.clone(),
                group: config.group,
            });
        }
        Ok(Self {
            category: config.category,
            matcher: Matcher::Pattern {
                regex,
                group: config.group,
            },
            validator: config.validator,
        })
    }
}

/// The ordered rule table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    rules: Vec<PatternRule>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    /// The built-in rules, in matching order.
    pub fn builtin() -> Self {
        use Category as C;

        let rules = vec![
            PatternRule::scan(C::PunctReps, scanners::punct_runs).validated(Validator::NoEmoji),
            PatternRule::pattern(C::PunctReps, DOT_RUNS.clone(), 0),
            PatternRule::scan(C::LetterReps, scanners::letter_reps),
            PatternRule::pattern(C::NoSpaces, NO_SPACES.clone(), 0).validated(Validator::NoDomain),
            PatternRule::pattern(C::CapitalLetters, CAPITAL_LETTERS.clone(), 1),
            PatternRule::scan(C::ForeignLetters, scanners::foreign_letters)
                .validated(Validator::ForeignWords),
            PatternRule::pattern(C::IgnoredCapital, IGNORED_CAPITAL.clone(), 0)
                .validated(Validator::NoDomain),
            PatternRule::pattern(C::IncorrectSpaces, INCORRECT_SPACES.clone(), 0),
            PatternRule::scan(C::ForeignZLetters, scanners::foreign_z_letters)
                .validated(Validator::ZWords),
        ];
        Self { rules }
    }

    /// The built-in rules followed by rules compiled from configuration.
    pub fn with_rules(configs: &[PatternRuleConfig]) -> ConfigResult<Self> {
        let mut vocabulary = Self::builtin();
        for config in configs {
            vocabulary.rules.push(PatternRule::from_config(config)?);
        }
        if !configs.is_empty() {
            tracing::debug!(user_rules = configs.len(), "appended configured rules");
        }
        Ok(vocabulary)
    }

    /// The rules in matching order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Run every rule whose category is enabled and collect the validated
    /// matches as character-offset candidates, in rule order.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn scan(
        &self,
        text: &str,
        offsets: &OffsetMap,
        lexicon: &Lexicon,
        enabled: CategorySet,
    ) -> Vec<Annotation> {
        let mut candidates = Vec::new();

        for rule in self.rules.iter().filter(|r| enabled.contains(r.category)) {
            let before = candidates.len();
            for range in rule.matcher.find_all(text) {
                if let Some(validator) = rule.validator
                    && !validator.accepts(&text[range.clone()], lexicon)
                {
                    continue;
                }
                candidates.push(Annotation::new(offsets.span(range), rule.category));
            }
            tracing::trace!(
                category = rule.category.as_str(),
                matches = candidates.len() - before,
                "rule scanned"
            );
        }

        candidates
    }
}
