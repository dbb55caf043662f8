//! The annotation engine.
//!
//! An [`Annotator`] is built once from a [`Config`]: rule vocabulary, word
//! lists and emoji table are resolved at construction and never change
//! afterwards. Each call to [`Annotator::annotate`] then runs one pass over
//! a [`Document`]:
//!
//! 1. span validation and the layer check;
//! 2. the pattern vocabulary;
//! 3. the protected-span filter;
//! 4. the layer heuristics (missing commas, unknown words, emoticons, emojis);
//! 5. aggregation into units and the text score.
//!
//! The annotator holds no per-text state and is `Send + Sync`.

use crate::category::{Category, CategorySet};
use crate::config::{Config, UnitMode};
use crate::error::{AnnotateError, AnnotateResult, ConfigResult};
use crate::heuristics;
use crate::layers::{Document, LayerKind, WordToken};
use crate::lexicon::Lexicon;
use crate::protect::ProtectedIndex;
use crate::report::AnnotationReport;
use crate::span::{OffsetMap, Span};
use crate::vocabulary::Vocabulary;

/// The upstream layer a category reads, if any.
///
/// Pattern categories only need the text; compound tokens and words are
/// always present.
pub const fn required_layer(category: Category) -> Option<LayerKind> {
    match category {
        Category::MissingCommas => Some(LayerKind::Clauses),
        Category::UnknownWords => Some(LayerKind::Morph),
        _ => None,
    }
}

/// A configured, reusable annotation engine.
#[derive(Debug, Clone)]
pub struct Annotator {
    vocabulary: Vocabulary,
    lexicon: Lexicon,
    enabled: CategorySet,
    unit: UnitMode,
}

impl Default for Annotator {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::builtin(),
            lexicon: Lexicon::default(),
            enabled: crate::config::CategoryToggles::default().enabled(),
            unit: UnitMode::default(),
        }
    }
}

impl Annotator {
    /// Build an annotator from configuration.
    ///
    /// Fails when a configured rule does not compile or a lexicon file
    /// cannot be read.
    #[tracing::instrument(skip_all, fields(unit = %config.unit))]
    pub fn new(config: &Config) -> ConfigResult<Self> {
        let vocabulary = Vocabulary::with_rules(config.rules.as_deref().unwrap_or_default())?;
        let lexicon = Lexicon::load(&config.lexicon)?;
        let enabled = config.categories.enabled();

        tracing::debug!(
            rules = vocabulary.rules().len(),
            categories = enabled.iter().count(),
            "annotator ready"
        );
        Ok(Self {
            vocabulary,
            lexicon,
            enabled,
            unit: config.unit,
        })
    }

    /// Replace the enabled categories.
    #[must_use]
    pub const fn with_categories(mut self, enabled: CategorySet) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the unit mode.
    #[must_use]
    pub const fn with_unit(mut self, unit: UnitMode) -> Self {
        self.unit = unit;
        self
    }

    /// The enabled categories.
    pub const fn enabled(&self) -> CategorySet {
        self.enabled
    }

    /// The unit mode.
    pub const fn unit(&self) -> UnitMode {
        self.unit
    }

    /// The loaded lexicon.
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// The rule vocabulary.
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Check that `doc` carries every layer the enabled categories and the
    /// unit mode need.
    pub fn check_layers(&self, doc: &Document) -> AnnotateResult<()> {
        check_layers_for(doc, self.enabled, self.unit)
    }

    /// Annotate a document with the enabled categories.
    pub fn annotate(&self, doc: &Document) -> AnnotateResult<AnnotationReport> {
        self.annotate_categories(doc, self.enabled)
    }

    /// Annotate a document with an explicit category set.
    pub fn annotate_categories(
        &self,
        doc: &Document,
        enabled: CategorySet,
    ) -> AnnotateResult<AnnotationReport> {
        self.annotate_with(doc, enabled, self.unit)
    }

    /// Annotate a document with an explicit category set and unit mode.
    #[tracing::instrument(
        skip_all,
        fields(chars = tracing::field::Empty, words = doc.words.len(), %unit)
    )]
    pub fn annotate_with(
        &self,
        doc: &Document,
        enabled: CategorySet,
        unit: UnitMode,
    ) -> AnnotateResult<AnnotationReport> {
        doc.validate_spans()?;
        check_layers_for(doc, enabled, unit)?;

        let offsets = OffsetMap::new(&doc.text);
        tracing::Span::current().record("chars", offsets.char_len());

        let candidates = self
            .vocabulary
            .scan(&doc.text, &offsets, &self.lexicon, enabled);
        let mut annotations = ProtectedIndex::from_tokens(&doc.compound_tokens).filter(candidates);

        if enabled.contains(Category::MissingCommas)
            && let Some(ref clauses) = doc.clauses
        {
            annotations.extend(heuristics::missing_commas(
                &doc.words,
                clauses,
                &self.lexicon.comma,
            ));
        }
        if enabled.contains(Category::UnknownWords)
            && let Some(ref morph) = doc.morph
        {
            annotations.extend(heuristics::unknown_words(morph, &doc.compound_tokens));
        }
        if enabled.contains(Category::Emoticons) {
            annotations.extend(heuristics::emoticons(&doc.compound_tokens));
        }
        if enabled.contains(Category::Emojis) {
            annotations.extend(heuristics::find_emojis(&doc.text, &self.lexicon.emoji));
        }

        let units = match unit {
            UnitMode::Document => vec![Span::new(0, offsets.char_len())],
            UnitMode::Paragraph => doc.paragraphs.clone().unwrap_or_default(),
        };
        let word_spans: Vec<Span> = doc.words.iter().map(WordToken::span).collect();

        let report = AnnotationReport::aggregate(annotations, &units, &word_spans, enabled);
        tracing::debug!(
            annotations = report.annotations.len(),
            anomaly_total = report.anomaly_total,
            word_count = report.word_count,
            "document annotated"
        );
        Ok(report)
    }
}

/// Categories in `enabled` whose layer `doc` does not carry.
pub fn unsupported_categories(doc: &Document, enabled: CategorySet) -> Vec<Category> {
    enabled
        .iter()
        .filter(|c| required_layer(*c).is_some_and(|layer| !doc.has_layer(layer)))
        .collect()
}

fn check_layers_for(doc: &Document, enabled: CategorySet, unit: UnitMode) -> AnnotateResult<()> {
    for category in enabled.iter() {
        if let Some(layer) = required_layer(category)
            && !doc.has_layer(layer)
        {
            return Err(AnnotateError::MissingLayer {
                layer,
                needed_by: category.as_str().to_string(),
            });
        }
    }
    if unit == UnitMode::Paragraph && !doc.has_layer(LayerKind::Paragraphs) {
        return Err(AnnotateError::MissingLayer {
            layer: LayerKind::Paragraphs,
            needed_by: "paragraph units".to_string(),
        });
    }
    Ok(())
}
