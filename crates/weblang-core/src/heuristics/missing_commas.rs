//! Missing-comma detection from two clause segmentations.
//!
//! The strict segmentation only splits where a comma is written; the relaxed
//! one also splits where a comma should be. A word that starts a relaxed
//! clause but no strict clause sits on a boundary without its comma.

use std::collections::{HashMap, HashSet};

use crate::category::Category;
use crate::layers::{Clause, ClauseLayers, WordToken};
use crate::lexicon::CommaExclusions;
use crate::report::Annotation;

/// Politeness marker that never takes a comma of its own.
const POLITENESS_MARKER: &str = "palun";

/// Find missing commas.
///
/// For every word start `p` that opens a relaxed clause but no strict one:
/// - `prev` is the relaxed clause with the greatest end at or before `p`,
///   `next` the relaxed clause starting at `p`;
/// - the candidate is suppressed when `prev` ends in a trailing word, unless
///   `next` starts with a pivot word;
/// - it is suppressed anyway when `next` starts with a pivot and `prev` ends
///   in one of that pivot's triggers;
/// - a word whose text is exactly `palun` is never a candidate.
///
/// Each surviving candidate is annotated over the word at `p`.
#[tracing::instrument(skip_all, fields(words = words.len()))]
pub fn missing_commas(
    words: &[WordToken],
    clauses: &ClauseLayers,
    table: &CommaExclusions,
) -> Vec<Annotation> {
    let strict_starts: HashSet<usize> = clauses.strict.iter().map(|c| c.start).collect();

    let mut relaxed_by_start: HashMap<usize, &Clause> = HashMap::new();
    for clause in &clauses.relaxed {
        relaxed_by_start.entry(clause.start).or_insert(clause);
    }

    let mut by_end: Vec<&Clause> = clauses.relaxed.iter().collect();
    by_end.sort_by_key(|c| (c.end, c.start));

    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for word in words {
        if !seen.insert(word.start) || strict_starts.contains(&word.start) {
            continue;
        }
        let Some(next) = relaxed_by_start.get(&word.start) else {
            continue;
        };
        if word.text == POLITENESS_MARKER {
            continue;
        }

        let ends_before = by_end.partition_point(|c| c.end <= word.start);
        let prev = ends_before.checked_sub(1).map(|i| by_end[i]);
        let last = prev.and_then(Clause::last_word).map(str::to_lowercase);
        let first = next.first_word().map(str::to_lowercase);

        if is_suppressed(last.as_deref(), first.as_deref(), table) {
            tracing::trace!(start = word.start, ?last, ?first, "boundary excluded");
            continue;
        }
        found.push(Annotation::new(word.span(), Category::MissingCommas));
    }

    tracing::debug!(found = found.len(), "missing commas");
    found
}

/// Apply the exclusion table to one boundary.
fn is_suppressed(last: Option<&str>, first: Option<&str>, table: &CommaExclusions) -> bool {
    let Some(last) = last else {
        return false;
    };

    let opens_with_pivot = first.is_some_and(|f| table.is_pivot(f));
    let trailing = table.trailing_words.contains(last) && !opens_with_pivot;

    let pivot_triggered = first.is_some_and(|f| {
        table
            .pivots
            .iter()
            .any(|p| p.word == f && p.triggers.iter().any(|t| t == last))
    });

    trailing || pivot_triggered
}
