//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use weblang_core::Annotator;
use weblang_core::config::{Config, ConfigSources};

pub mod annotate;
pub mod categories;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Build the annotator, resolving lexicon files relative to the config file
/// that named them.
pub fn build_annotator(config: &Config, sources: &ConfigSources) -> anyhow::Result<Annotator> {
    let mut config = config.clone();
    if let Some(dir) = sources.primary_dir() {
        config.lexicon = config.lexicon.resolve_paths(dir);
    }
    Annotator::new(&config).context("failed to build annotator from configuration")
}
