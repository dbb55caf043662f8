//! Annotate command: run the engine over documents and report the results.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use weblang_core::config::{Config, ConfigSources};
use weblang_core::engine::unsupported_categories;
use weblang_core::span::OffsetMap;
use weblang_core::text::plain_document;
use weblang_core::{Annotator, AnnotationReport, Category, CategorySet, Document, UnitMode};

use super::{build_annotator, read_input_file};

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Files to annotate: JSON documents with layers, or plain `.txt` text.
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Analysis unit (overrides config).
    #[arg(long, value_enum)]
    pub unit: Option<UnitMode>,

    /// Enable categories (comma-separated).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub enable: Vec<Category>,

    /// Disable categories (comma-separated, applied after --enable).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub disable: Vec<Category>,

    /// Fail when a document's score exceeds this value.
    #[arg(long)]
    pub max_score: Option<f64>,

    /// Print counts only, without individual annotations.
    #[arg(long)]
    pub summary: bool,
}

/// One annotated file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: Utf8PathBuf,
    #[serde(flatten)]
    report: AnnotationReport,
    /// Enabled categories left unscored because the input lacks their layer.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<Category>,
    #[serde(skip)]
    text: String,
}

/// Annotate each file and print the results.
#[instrument(name = "cmd_annotate", skip_all, fields(files = args.files.len()))]
pub fn cmd_annotate(
    args: AnnotateArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let mut annotator = build_annotator(config, sources)?;
    if let Some(unit) = args.unit {
        annotator = annotator.with_unit(unit);
    }
    let enabled = resolve_categories(annotator.enabled(), &args.enable, &args.disable);
    let max_score = args.max_score.or(config.max_score);
    debug!(unit = %annotator.unit(), ?max_score, "executing annotate command");

    let progress = if args.files.len() > 1 && !global_json {
        let bar = ProgressBar::new(args.files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut reports = Vec::with_capacity(args.files.len());
    for file in &args.files {
        progress.set_message(file.to_string());
        reports.push(annotate_file(&annotator, file, enabled, max_input_bytes)?);
        progress.inc(1);
    }
    progress.finish_and_clear();

    if global_json {
        if let [single] = reports.as_slice() {
            println!("{}", serde_json::to_string_pretty(single)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    } else {
        for report in &reports {
            print_report(report, args.summary);
        }
    }

    if let Some(max) = max_score {
        let over: Vec<String> = reports
            .iter()
            .filter_map(|r| {
                r.report
                    .score
                    .filter(|s| *s > max)
                    .map(|s| format!("{} scores {s:.3}", r.file))
            })
            .collect();
        if !over.is_empty() {
            bail!("{} (max: {max:.3})", over.join("; "));
        }
    }

    Ok(())
}

/// Apply `--enable` then `--disable` to the configured set.
fn resolve_categories(base: CategorySet, enable: &[Category], disable: &[Category]) -> CategorySet {
    let mut enabled = base;
    for category in enable {
        enabled.insert(*category);
    }
    for category in disable {
        enabled.remove(*category);
    }
    enabled
}

fn annotate_file(
    annotator: &Annotator,
    file: &Utf8Path,
    mut enabled: CategorySet,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<FileReport> {
    let content = read_input_file(file, max_input_bytes)?;
    let doc = load_document(file, content)?;

    // Plain text has no clause or morph layers.
    let skipped = if file.extension() == Some("txt") {
        unsupported_categories(&doc, enabled)
    } else {
        Vec::new()
    };
    if !skipped.is_empty() {
        for category in &skipped {
            enabled.remove(*category);
        }
        warn!(
            %file,
            skipped = %category_list(&skipped),
            "plain text has no clause or morph layers; categories not scored"
        );
    }

    let report = annotator
        .annotate_categories(&doc, enabled)
        .with_context(|| format!("failed to annotate {file}"))?;

    Ok(FileReport {
        file: file.to_path_buf(),
        report,
        skipped,
        text: doc.text,
    })
}

fn category_list(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a layer document, or segment plain text for `.txt` files.
fn load_document(file: &Utf8Path, content: String) -> anyhow::Result<Document> {
    if file.extension() == Some("txt") {
        return Ok(plain_document(&content));
    }
    serde_json::from_str(&content).with_context(|| format!("{file} is not a valid JSON document"))
}

fn print_report(file_report: &FileReport, summary: bool) {
    let report = &file_report.report;
    let score = report
        .score
        .map_or_else(|| "n/a".to_string(), |s| format!("{s:.3}"));
    println!(
        "{}: score {} ({} anomalies / {} words)",
        file_report.file.bold(),
        score.cyan(),
        report.anomaly_total,
        report.word_count
    );

    if !summary && !report.annotations.is_empty() {
        let offsets = OffsetMap::new(&file_report.text);
        for annotation in &report.annotations {
            let snippet = &file_report.text[offsets.byte_range(annotation.span())];
            println!(
                "  {:>12}  {:<17} {:?}",
                annotation.span().to_string().dimmed(),
                annotation.category.as_str().yellow(),
                snippet
            );
        }
    }

    if !file_report.skipped.is_empty() {
        println!(
            "  {} {}",
            "not scored (no layer):".dimmed(),
            category_list(&file_report.skipped)
        );
    }

    for (idx, unit) in report.units.iter().enumerate() {
        let counts: Vec<String> = unit
            .counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(c, n)| format!("{c} {n}"))
            .collect();
        let counts = if counts.is_empty() {
            "no anomalies".to_string()
        } else {
            counts.join(", ")
        };
        if report.units.len() > 1 {
            println!(
                "  {} {} ({} words): {}",
                "unit".dimmed(),
                idx + 1,
                unit.counts.word_count,
                counts
            );
        } else {
            println!("  {counts}");
        }
    }
}
