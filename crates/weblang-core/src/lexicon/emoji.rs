//! Emoji code-point table.
//!
//! A grapheme cluster is an emoji when any of its code points falls in the
//! table. Regional indicators (flag halves) are tracked separately because a
//! flag is a pair of ordinary letters-in-boxes rather than one designated
//! emoji code point.

use std::ops::RangeInclusive;

use camino::Utf8Path;

use crate::error::{ConfigError, ConfigResult};

/// Regional indicator symbols `🇦`..`🇿`.
pub const REGIONAL_INDICATORS: RangeInclusive<u32> = 0x1F1E6..=0x1F1FF;

/// Default emoji ranges: code points with the Unicode `Emoji` property,
/// excluding digits, `#` and `*`.
const DEFAULT_RANGES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
    (0x2600, 0x2604),
    (0x260E, 0x260E),
    (0x2611, 0x2611),
    (0x2614, 0x2615),
    (0x2618, 0x2618),
    (0x261D, 0x261D),
    (0x2620, 0x2620),
    (0x2622, 0x2623),
    (0x2626, 0x2626),
    (0x262A, 0x262A),
    (0x262E, 0x262F),
    (0x2638, 0x263A),
    (0x2640, 0x2640),
    (0x2642, 0x2642),
    (0x2648, 0x2653),
    (0x265F, 0x2660),
    (0x2663, 0x2663),
    (0x2665, 0x2666),
    (0x2668, 0x2668),
    (0x267B, 0x267B),
    (0x267E, 0x267F),
    (0x2692, 0x2697),
    (0x2699, 0x2699),
    (0x269B, 0x269C),
    (0x26A0, 0x26A1),
    (0x26A7, 0x26A7),
    (0x26AA, 0x26AB),
    (0x26B0, 0x26B1),
    (0x26BD, 0x26BE),
    (0x26C4, 0x26C5),
    (0x26C8, 0x26C8),
    (0x26CE, 0x26CF),
    (0x26D1, 0x26D1),
    (0x26D3, 0x26D4),
    (0x26E9, 0x26EA),
    (0x26F0, 0x26F5),
    (0x26F7, 0x26FA),
    (0x26FD, 0x26FD),
    (0x2702, 0x2702),
    (0x2705, 0x2705),
    (0x2708, 0x270D),
    (0x270F, 0x270F),
    (0x2712, 0x2712),
    (0x2714, 0x2714),
    (0x2716, 0x2716),
    (0x271D, 0x271D),
    (0x2721, 0x2721),
    (0x2728, 0x2728),
    (0x2733, 0x2734),
    (0x2744, 0x2744),
    (0x2747, 0x2747),
    (0x274C, 0x274C),
    (0x274E, 0x274E),
    (0x2753, 0x2755),
    (0x2757, 0x2757),
    (0x2763, 0x2764),
    (0x2795, 0x2797),
    (0x27A1, 0x27A1),
    (0x27B0, 0x27B0),
    (0x27BF, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0x1F004, 0x1F004),
    (0x1F0CF, 0x1F0CF),
    (0x1F170, 0x1F19A),
    (0x1F201, 0x1F251),
    (0x1F300, 0x1F64F),
    (0x1F680, 0x1F6FF),
    (0x1F7E0, 0x1F7EB),
    (0x1F900, 0x1FAFF),
];

/// A set of emoji code points stored as sorted, non-overlapping ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiSet {
    ranges: Vec<(u32, u32)>,
}

impl EmojiSet {
    /// Build a set from inclusive `(first, last)` ranges.
    ///
    /// Ranges are sorted and merged.
    pub fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut sorted: Vec<(u32, u32)> = ranges
            .into_iter()
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        sorted.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
        for (first, last) in sorted {
            match merged.last_mut() {
                Some(prev) if first <= prev.1.saturating_add(1) => prev.1 = prev.1.max(last),
                _ => merged.push((first, last)),
            }
        }
        Self { ranges: merged }
    }

    /// Returns `true` if `c` is an emoji code point.
    pub fn contains(&self, c: char) -> bool {
        let cp = c as u32;
        let idx = self.ranges.partition_point(|&(_, last)| last < cp);
        self.ranges.get(idx).is_some_and(|&(first, _)| first <= cp)
    }

    /// Number of merged ranges.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Load a table file.
    ///
    /// Each non-blank, non-comment line holds a hexadecimal code point
    /// (`1F600`) or an inclusive range (`1F600..1F64F`), optionally followed
    /// by `;` or `#` and free text, as in the Unicode data files.
    pub fn load(path: &Utf8Path) -> ConfigResult<Self> {
        let content =
            std::fs::read_to_string(path.as_std_path()).map_err(|e| ConfigError::LexiconFile {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut ranges = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let entry = line
                .split(['#', ';'])
                .next()
                .unwrap_or_default()
                .trim();
            if entry.is_empty() {
                continue;
            }
            let range = parse_entry(entry).ok_or_else(|| ConfigError::EmojiTable {
                path: path.to_path_buf(),
                line: idx + 1,
                entry: entry.to_string(),
            })?;
            ranges.push(range);
        }

        let set = Self::from_ranges(ranges);
        tracing::debug!(%path, ranges = set.range_count(), "loaded emoji table");
        Ok(set)
    }
}

impl Default for EmojiSet {
    fn default() -> Self {
        Self::from_ranges(DEFAULT_RANGES.iter().copied())
    }
}

/// Returns `true` if `c` is a regional indicator symbol.
pub fn is_regional_indicator(c: char) -> bool {
    REGIONAL_INDICATORS.contains(&(c as u32))
}

fn parse_entry(entry: &str) -> Option<(u32, u32)> {
    let parse = |s: &str| u32::from_str_radix(s.trim().trim_start_matches("U+"), 16).ok();
    match entry.split_once("..") {
        Some((first, last)) => Some((parse(first)?, parse(last)?)),
        None => parse(entry).map(|cp| (cp, cp)),
    }
}
