//! Protected-span filter.
//!
//! Pattern matches inside web addresses, e-mails, mentions, hashtags,
//! non-ending abbreviations and emoticons are not anomalies. The filter drops
//! every candidate that overlaps such a span.

use crate::layers::CompoundToken;
use crate::report::Annotation;
use crate::span::Span;

/// Protected spans sorted by start, with a running maximum of their ends.
///
/// Overlap with `c` means some protected `p` has `p.start <= c.start < p.end`
/// or `c.start <= p.start < c.end`. The first case is answered by the running
/// maximum over spans starting at or before `c.start`, the second by a binary
/// search for the first span starting at or after `c.start`.
#[derive(Debug, Clone, Default)]
pub struct ProtectedIndex {
    spans: Vec<Span>,
    max_end: Vec<usize>,
}

impl ProtectedIndex {
    /// Index the compound tokens carrying a protected kind.
    pub fn from_tokens(tokens: &[CompoundToken]) -> Self {
        Self::from_spans(
            tokens
                .iter()
                .filter(|t| t.kinds.iter().any(|k| k.is_protected()))
                .map(CompoundToken::span),
        )
    }

    /// Index arbitrary spans.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut spans: Vec<Span> = spans.into_iter().collect();
        spans.sort_unstable();

        let mut running = 0;
        let max_end = spans
            .iter()
            .map(|s| {
                running = running.max(s.end);
                running
            })
            .collect();

        Self { spans, max_end }
    }

    /// Number of indexed spans.
    pub const fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if nothing is protected.
    pub const fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns `true` if `span` overlaps any protected span.
    pub fn overlaps(&self, span: Span) -> bool {
        let at_or_before = self.spans.partition_point(|p| p.start <= span.start);
        if at_or_before > 0 && self.max_end[at_or_before - 1] > span.start {
            return true;
        }

        let from = self.spans.partition_point(|p| p.start < span.start);
        self.spans
            .get(from)
            .is_some_and(|p| p.start < span.end)
    }

    /// Keep the candidates that overlap no protected span.
    ///
    /// The result is always a subset of the input, in input order.
    pub fn filter(&self, mut candidates: Vec<Annotation>) -> Vec<Annotation> {
        if self.is_empty() {
            return candidates;
        }
        let before = candidates.len();
        candidates.retain(|c| !self.overlaps(c.span()));
        tracing::debug!(
            protected = self.len(),
            dropped = before - candidates.len(),
            "filtered protected spans"
        );
        candidates
    }
}
