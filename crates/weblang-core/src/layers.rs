//! Upstream annotation layers consumed by the engine.
//!
//! Tokenization, segmentation, compound-token recognition, clause
//! segmentation and morphological analysis all happen before weblang runs.
//! Their results arrive here as a [`Document`]: the text plus read-only
//! layers whose spans are character offsets into that text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnnotateError, AnnotateResult};
use crate::span::Span;
use crate::text::is_upper;

/// Identifies one upstream layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Word tokens.
    Words,
    /// Compound tokens (addresses, emails, mentions, emoticons, ...).
    CompoundTokens,
    /// Strict and relaxed clause segmentations.
    Clauses,
    /// Morphological analysis results.
    Morph,
    /// Paragraph boundaries.
    Paragraphs,
}

impl LayerKind {
    /// Returns the layer name as used in documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Words => "words",
            Self::CompoundTokens => "compound_tokens",
            Self::Clauses => "clauses",
            Self::Morph => "morph",
            Self::Paragraphs => "paragraphs",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A word token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WordToken {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Surface text.
    pub text: String,
}

impl WordToken {
    /// The token's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Kinds assigned to compound tokens by the upstream recogniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A web address.
    WwwAddress,
    /// An e-mail address.
    Email,
    /// An abbreviation that does not end a sentence.
    NonEndingAbbreviation,
    /// A `@user` mention.
    UsernameMention,
    /// A `#tag`.
    Hashtag,
    /// An emoticon such as `:)`.
    Emoticon,
    /// A name written with an initial (`J. Smith`).
    NameWithInitial,
    /// Any kind weblang does not act on.
    #[serde(other)]
    Other,
}

impl TokenKind {
    /// Returns `true` for kinds whose spans suppress pattern matches.
    pub const fn is_protected(self) -> bool {
        matches!(
            self,
            Self::WwwAddress
                | Self::Email
                | Self::NonEndingAbbreviation
                | Self::UsernameMention
                | Self::Hashtag
                | Self::Emoticon
        )
    }
}

/// A compound token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompoundToken {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Kinds assigned by the recogniser.
    #[serde(default)]
    pub kinds: Vec<TokenKind>,
    /// Normalized text, if the recogniser produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
}

impl CompoundToken {
    /// The token's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Returns `true` if the token carries `kind`.
    pub fn has_kind(&self, kind: TokenKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// One clause from a clause segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Clause {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Texts of the words making up the clause, in order.
    #[serde(default)]
    pub words: Vec<String>,
}

impl Clause {
    /// The clause's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The first word of the clause.
    pub fn first_word(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    /// The last word of the clause.
    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }
}

/// Two clause segmentations of the same text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClauseLayers {
    /// Comma-aware clauses.
    pub strict: Vec<Clause>,
    /// Clauses split at boundaries even where no comma is written.
    pub relaxed: Vec<Clause>,
}

/// A morphologically analysed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MorphToken {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Surface text.
    pub text: String,
    /// Lemma, or `None` when the analyser could not analyse the word.
    #[serde(default)]
    pub lemma: Option<String>,
}

impl MorphToken {
    /// The token's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Returns `true` if the text starts with an uppercase Estonian letter.
    ///
    /// Acronyms, abbreviations and names all have this prefix.
    pub fn has_capital_prefix(&self) -> bool {
        self.text.chars().next().is_some_and(is_upper)
    }
}

/// A text plus its upstream layers.
///
/// Optional layers are only needed by the categories that use them; the
/// engine reports [`AnnotateError::MissingLayer`] before scanning when an
/// enabled category needs a layer that is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    /// The text being annotated.
    pub text: String,
    /// Word tokens.
    #[serde(default)]
    pub words: Vec<WordToken>,
    /// Compound tokens.
    #[serde(default)]
    pub compound_tokens: Vec<CompoundToken>,
    /// Clause segmentations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clauses: Option<ClauseLayers>,
    /// Morphological analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph: Option<Vec<MorphToken>>,
    /// Paragraph boundaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<Span>>,
}

impl Document {
    /// A document with no layers.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns `true` if the optional layer is present.
    ///
    /// Words and compound tokens are always present (possibly empty).
    pub const fn has_layer(&self, layer: LayerKind) -> bool {
        match layer {
            LayerKind::Words | LayerKind::CompoundTokens => true,
            LayerKind::Clauses => self.clauses.is_some(),
            LayerKind::Morph => self.morph.is_some(),
            LayerKind::Paragraphs => self.paragraphs.is_some(),
        }
    }

    /// Check that every layer span is ordered and lies inside the text.
    pub fn validate_spans(&self) -> AnnotateResult<()> {
        let len = self.text.chars().count();
        let check = |layer: LayerKind, start: usize, end: usize| {
            if start > end || end > len {
                Err(AnnotateError::InvalidSpan {
                    layer,
                    start,
                    end,
                    len,
                })
            } else {
                Ok(())
            }
        };

        for w in &self.words {
            check(LayerKind::Words, w.start, w.end)?;
        }
        for ct in &self.compound_tokens {
            check(LayerKind::CompoundTokens, ct.start, ct.end)?;
        }
        if let Some(ref clauses) = self.clauses {
            for cl in clauses.strict.iter().chain(&clauses.relaxed) {
                check(LayerKind::Clauses, cl.start, cl.end)?;
            }
        }
        if let Some(ref morph) = self.morph {
            for m in morph {
                check(LayerKind::Morph, m.start, m.end)?;
            }
        }
        if let Some(ref paragraphs) = self.paragraphs {
            for p in paragraphs {
                check(LayerKind::Paragraphs, p.start, p.end)?;
            }
        }
        Ok(())
    }
}
