//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! The following configuration file formats are supported:
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `weblang.<ext>` in current directory or any parent
//! - `.weblang.<ext>` in current directory or any parent
//! - `~/.config/weblang/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`
//!
//! When multiple files exist in the same directory, all are merged via figment.
//! Later extensions override earlier: toml < yaml < yml < json.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use weblang_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategorySet};
use crate::error::{ConfigError, ConfigResult};
use crate::lexicon::PivotRule;
use crate::vocabulary::Validator;

/// How the text is divided into analysis units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum UnitMode {
    /// The whole text is one unit.
    #[default]
    Document,
    /// Each paragraph is a unit.
    Paragraph,
}

impl UnitMode {
    /// Returns the mode name as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Paragraph => "paragraph",
        }
    }
}

impl std::fmt::Display for UnitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category switches.
///
/// Everything is enabled by default except `punct_reps`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct CategoryToggles {
    /// Repeated punctuation.
    pub punct_reps: bool,
    /// Repeated letters.
    pub letter_reps: bool,
    /// Missing space after punctuation.
    pub no_spaces: bool,
    /// Text written in capitals.
    pub capital_letters: bool,
    /// Letters `c q w x y`.
    pub foreign_letters: bool,
    /// The letter `z`.
    pub foreign_z_letters: bool,
    /// Missing capital after sentence punctuation.
    pub ignored_capital: bool,
    /// Spaces on both sides of punctuation.
    pub incorrect_spaces: bool,
    /// Emoticons.
    pub emoticons: bool,
    /// Emojis and flags.
    pub emojis: bool,
    /// Missing commas.
    pub missing_commas: bool,
    /// Unknown words.
    pub unknown_words: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            punct_reps: false,
            letter_reps: true,
            no_spaces: true,
            capital_letters: true,
            foreign_letters: true,
            foreign_z_letters: true,
            ignored_capital: true,
            incorrect_spaces: true,
            emoticons: true,
            emojis: true,
            missing_commas: true,
            unknown_words: true,
        }
    }
}

impl CategoryToggles {
    /// Returns the switch for `category`.
    pub const fn get(&self, category: Category) -> bool {
        match category {
            Category::PunctReps => self.punct_reps,
            Category::LetterReps => self.letter_reps,
            Category::NoSpaces => self.no_spaces,
            Category::CapitalLetters => self.capital_letters,
            Category::ForeignLetters => self.foreign_letters,
            Category::ForeignZLetters => self.foreign_z_letters,
            Category::IgnoredCapital => self.ignored_capital,
            Category::IncorrectSpaces => self.incorrect_spaces,
            Category::Emoticons => self.emoticons,
            Category::Emojis => self.emojis,
            Category::MissingCommas => self.missing_commas,
            Category::UnknownWords => self.unknown_words,
        }
    }

    /// Set the switch for `category`.
    pub const fn set(&mut self, category: Category, enabled: bool) {
        let slot = match category {
            Category::PunctReps => &mut self.punct_reps,
            Category::LetterReps => &mut self.letter_reps,
            Category::NoSpaces => &mut self.no_spaces,
            Category::CapitalLetters => &mut self.capital_letters,
            Category::ForeignLetters => &mut self.foreign_letters,
            Category::ForeignZLetters => &mut self.foreign_z_letters,
            Category::IgnoredCapital => &mut self.ignored_capital,
            Category::IncorrectSpaces => &mut self.incorrect_spaces,
            Category::Emoticons => &mut self.emoticons,
            Category::Emojis => &mut self.emojis,
            Category::MissingCommas => &mut self.missing_commas,
            Category::UnknownWords => &mut self.unknown_words,
        };
        *slot = enabled;
    }

    /// The enabled categories as a set.
    pub fn enabled(&self) -> CategorySet {
        Category::ALL.into_iter().filter(|c| self.get(*c)).collect()
    }
}

/// Word lists and tables to load instead of the built-in ones.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LexiconConfig {
    /// Foreign-letter allow-list (one word per line).
    pub foreign_words_file: Option<Utf8PathBuf>,
    /// `z` allow-list (one word per line).
    pub z_words_file: Option<Utf8PathBuf>,
    /// Emoji code-point table (`XXXX` or `XXXX..YYYY` per line).
    pub emoji_table_file: Option<Utf8PathBuf>,
    /// Clause-final words that suppress a missing-comma candidate.
    /// An empty list disables the suppression.
    pub comma_trailing_words: Option<Vec<String>>,
    /// Pivot overrides for the missing-comma heuristic.
    pub comma_pivots: Option<Vec<PivotRule>>,
}

impl LexiconConfig {
    /// Resolve relative file paths against `base` (usually the directory of
    /// the config file that named them).
    pub fn resolve_paths(&self, base: &Utf8Path) -> Self {
        let resolve = |path: &Option<Utf8PathBuf>| {
            path.as_ref().map(|p| {
                if p.is_relative() {
                    base.join(p)
                } else {
                    p.clone()
                }
            })
        };
        Self {
            foreign_words_file: resolve(&self.foreign_words_file),
            z_words_file: resolve(&self.z_words_file),
            emoji_table_file: resolve(&self.emoji_table_file),
            ..self.clone()
        }
    }
}

/// An extra pattern rule appended after the built-in vocabulary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PatternRuleConfig {
    /// Category the rule reports.
    pub category: Category,
    /// Regular expression. `{LETTERS}`, `{ALPHANUM}`, `{LOWERCASE}`,
    /// `{UPPERCASE}` and `{NUMERIC}` expand to the alphabet's classes.
    pub pattern: String,
    /// Capture group giving the annotation span (0 = whole match).
    #[serde(default)]
    pub group: usize,
    /// Optional built-in validator applied to each match.
    #[serde(default)]
    pub validator: Option<Validator>,
}

/// The configuration for weblang.
///
/// This struct is deserialized from config files found during discovery
/// (TOML, YAML, or JSON).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for JSONL log files. No file log is written when unset.
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Prevents resource exhaustion from oversized inputs in both CLI and MCP server.
    /// Omit to use the default (5 MiB). Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    /// Default: `false`.
    #[serde(default)]
    pub disable_input_limit: bool,
    /// Analysis unit: the whole document or each paragraph.
    pub unit: UnitMode,
    /// Per-category switches.
    pub categories: CategoryToggles,
    /// Fail `annotate` when the score exceeds this value.
    pub max_score: Option<f64>,
    /// Word list and table overrides.
    pub lexicon: LexiconConfig,
    /// Extra pattern rules, matched after the built-in ones in order.
    pub rules: Option<Vec<PatternRuleConfig>>,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }

    /// Directory of the primary config file, for resolving relative paths.
    pub fn primary_dir(&self) -> Option<&Utf8Path> {
        self.primary_file().and_then(Utf8Path::parent)
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "weblang";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/weblang/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. `WEBLANG_*` environment variables (`__` separates nested keys)
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/weblang/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // WEBLANG_UNIT=paragraph, WEBLANG_CATEGORIES__PUNCT_REPS=true, etc.
        figment = figment.merge(Env::prefixed("WEBLANG_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            unit = config.unit.as_str(),
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, ordered low-to-high precedence: dotfiles before regular files.
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Check the marker after the config files so a config next to
            // the marker is still found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;

        for ext in CONFIG_EXTENSIONS {
            let config_path = config_dir.join(format!("config.{ext}"));
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        None
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the user config directory path.
///
/// Returns `~/.config/weblang/` on Linux, `~/Library/Application Support/weblang/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}
