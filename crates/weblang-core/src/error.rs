//! Error types for weblang-core.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::category::Category;
use crate::layers::LayerKind;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A user-supplied pattern rule does not compile.
    #[error("invalid pattern for {category} rule `{pattern}`: {source}")]
    InvalidPattern {
        /// Category the rule was meant to report.
        category: Category,
        /// The offending pattern text.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: Box<regex::Error>,
    },

    /// A user-supplied pattern rule refers to a capture group the pattern lacks.
    #[error("pattern `{pattern}` has no capture group {group}")]
    MissingGroup {
        /// The offending pattern text.
        pattern: String,
        /// The requested capture group index.
        group: usize,
    },

    /// A lexicon file (word list or emoji table) could not be read.
    #[error("failed to read lexicon file {path}: {source}")]
    LexiconFile {
        /// Path of the file that failed to load.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An emoji table line is not a code point or code point range.
    #[error("{path}:{line}: invalid code point entry `{entry}`")]
    EmojiTable {
        /// Path of the emoji table.
        path: Utf8PathBuf,
        /// 1-indexed line number.
        line: usize,
        /// The entry that failed to parse.
        entry: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while annotating a document.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// An enabled category or the unit mode needs a layer the document lacks.
    #[error("{needed_by} requires the `{layer}` layer, which the document does not provide")]
    MissingLayer {
        /// The missing layer.
        layer: LayerKind,
        /// What needs it (a category name or the unit mode).
        needed_by: String,
    },

    /// A layer span is reversed or lies outside the text.
    #[error("{layer} span {start}..{end} is invalid for a text of {len} characters")]
    InvalidSpan {
        /// Layer containing the bad span.
        layer: LayerKind,
        /// Span start offset.
        start: usize,
        /// Span end offset.
        end: usize,
        /// Text length in characters.
        len: usize,
    },
}

/// Result type alias using [`AnnotateError`].
pub type AnnotateResult<T> = Result<T, AnnotateError>;
