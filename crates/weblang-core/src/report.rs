//! Annotation output and per-unit aggregation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryCounts, CategorySet};
use crate::span::Span;

/// One anomaly found in the text.
///
/// Offsets are character offsets into the annotated text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Annotation {
    /// Start character offset.
    pub start: usize,
    /// End character offset.
    pub end: usize,
    /// Anomaly category.
    pub category: Category,
}

impl Annotation {
    /// Create an annotation over `span`.
    pub const fn new(span: Span, category: Category) -> Self {
        Self {
            start: span.start,
            end: span.end,
            category,
        }
    }

    /// The annotation's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Counts for one analysis unit.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct UnitReport {
    /// Start character offset of the unit.
    pub start: usize,
    /// End character offset of the unit.
    pub end: usize,
    /// Per-category counts plus `word_count`.
    pub counts: CategoryCounts,
}

impl UnitReport {
    /// The unit's span.
    pub const fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Sum of the unit's anomaly counters.
    pub fn total(&self) -> usize {
        self.counts.total()
    }
}

/// The result of annotating one document.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AnnotationReport {
    /// Surviving annotations ordered by start, end and category.
    pub annotations: Vec<Annotation>,
    /// One entry per analysis unit, in text order.
    pub units: Vec<UnitReport>,
    /// Sum of all anomaly counters across units.
    pub anomaly_total: usize,
    /// Sum of word counts across units.
    pub word_count: usize,
    /// `anomaly_total / word_count`, absent when there are no words.
    pub score: Option<f64>,
}

impl AnnotationReport {
    /// Aggregate annotations into the given units and compute the score.
    ///
    /// An annotation is counted in every unit that fully contains it. Word
    /// counts use the same containment rule over `word_spans`.
    pub fn aggregate(
        mut annotations: Vec<Annotation>,
        units: &[Span],
        word_spans: &[Span],
        enabled: CategorySet,
    ) -> Self {
        annotations.retain(|a| enabled.contains(a.category));
        annotations.sort_unstable();
        let mut words = word_spans.to_vec();
        words.sort_unstable();

        let units: Vec<UnitReport> = units
            .iter()
            .map(|unit| {
                let mut counts = CategoryCounts::new(enabled);
                let candidates = starting_within(&annotations, *unit, |a| a.start);
                for annotation in candidates.iter().filter(|a| unit.contains(&a.span())) {
                    counts.increment(annotation.category);
                }
                counts.word_count = starting_within(&words, *unit, |w| w.start)
                    .iter()
                    .filter(|w| unit.contains(w))
                    .count();
                UnitReport {
                    start: unit.start,
                    end: unit.end,
                    counts,
                }
            })
            .collect();

        let anomaly_total: usize = units.iter().map(UnitReport::total).sum();
        let word_count: usize = units.iter().map(|u| u.counts.word_count).sum();

        Self {
            annotations,
            units,
            anomaly_total,
            word_count,
            score: text_score(anomaly_total, word_count),
        }
    }

    /// Number of annotations in `category`.
    pub fn count(&self, category: Category) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.category == category)
            .count()
    }
}

/// The slice of `items` (sorted by start) whose start lies in
/// `unit.start..=unit.end`.
fn starting_within<T>(items: &[T], unit: Span, start: impl Fn(&T) -> usize) -> &[T] {
    let lo = items.partition_point(|item| start(item) < unit.start);
    let hi = items.partition_point(|item| start(item) <= unit.end);
    &items[lo..hi.max(lo)]
}

/// Whole-text score: anomalies per word, `None` when there are no words.
pub fn text_score(anomaly_total: usize, word_count: usize) -> Option<f64> {
    (word_count > 0).then(|| anomaly_total as f64 / word_count as f64)
}
