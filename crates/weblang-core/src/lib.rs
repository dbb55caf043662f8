//! Core library for weblang.
//!
//! weblang annotates web-language anomalies in Estonian text: repeated
//! punctuation and letters, missing spaces, shouting, foreign letters,
//! emojis and emoticons, missing commas and unknown words. Results are
//! per-unit counts plus an anomaly-per-word score.
//!
//! Tokenization, clause segmentation and morphological analysis happen
//! upstream; their output arrives as a [`Document`].
//!
//! # Modules
//!
//! - [`engine`] - The [`Annotator`] pipeline
//! - [`vocabulary`] - Pattern rules and validators
//! - [`heuristics`] - Layer-driven categories
//! - [`protect`] - Protected-span filter
//! - [`report`] - Annotations, unit counts and the score
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use weblang_core::{Annotator, Category, ConfigLoader, text::plain_document};
//!
//! let (config, _sources) = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! let annotator = Annotator::new(&config).expect("Failed to build annotator");
//! let enabled = [Category::PunctReps, Category::NoSpaces].into_iter().collect();
//! let doc = plain_document("tere!!!!kuidas läheb????");
//! let report = annotator
//!     .annotate_categories(&doc, enabled)
//!     .expect("Failed to annotate");
//!
//! println!("score: {:?}", report.score);
//! ```
#![deny(unsafe_code)]

pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod layers;
pub mod lexicon;
pub mod protect;
pub mod report;
pub mod scanners;
pub mod span;
pub mod text;
pub mod vocabulary;

pub use category::{Category, CategoryCounts, CategorySet};
pub use config::{Config, ConfigLoader, LogLevel, UnitMode};
pub use engine::Annotator;
pub use error::{AnnotateError, AnnotateResult, ConfigError, ConfigResult};
pub use layers::Document;
pub use report::{Annotation, AnnotationReport, UnitReport};
pub use span::Span;

/// Default input size limit for the CLI and MCP server: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
