//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Write `content` to `name` inside `dir` and return the path as a string.
fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

/// A layered document with one relaxed-only clause boundary at offset 6.
const LAYERED_DOC: &str = r#"{
  "text": "Ütlen tema tuli ära",
  "words": [
    {"start": 0, "end": 5, "text": "Ütlen"},
    {"start": 6, "end": 10, "text": "tema"},
    {"start": 11, "end": 15, "text": "tuli"},
    {"start": 16, "end": 19, "text": "ära"}
  ],
  "clauses": {
    "strict": [
      {"start": 0, "end": 10, "words": ["Ütlen", "tema"]},
      {"start": 11, "end": 19, "words": ["tuli", "ära"]}
    ],
    "relaxed": [
      {"start": 0, "end": 5, "words": ["Ütlen"]},
      {"start": 6, "end": 10, "words": ["tema"]},
      {"start": 11, "end": 19, "words": ["tuli", "ära"]}
    ]
  },
  "morph": [
    {"start": 0, "end": 5, "text": "Ütlen", "lemma": "ütlema"},
    {"start": 6, "end": 10, "text": "tema", "lemma": "tema"},
    {"start": 11, "end": 15, "text": "tuli", "lemma": "tulema"},
    {"start": 16, "end": 19, "text": "ära", "lemma": "ära"}
  ]
}"#;

/// Run `annotate --json` in `dir` and parse the output.
fn annotate_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "--json", "annotate"])
        .args(args)
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("annotate --json should output valid JSON")
}

fn count(report: &serde_json::Value, category: &str) -> usize {
    report["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["category"] == category)
        .count()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("WEBLANG_LOG_PATH"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["config"]["enabled_categories"].is_array());
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Annotate: plain text
// =============================================================================

#[test]
fn annotate_plain_text_finds_repeats_and_missing_space() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "tere!!!!kuidas läheb????");

    let report = annotate_json(tmp.path(), &[&file, "--enable", "punct_reps"]);

    assert!(count(&report, "punct_reps") >= 2);
    assert!(count(&report, "no_spaces") >= 1);
    assert!(report["file"].as_str().unwrap().ends_with("chat.txt"));
    assert!(report["score"].as_f64().unwrap() > 0.0);
}

#[test]
fn annotate_plain_text_shouting() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "shout.txt", "MIDA SA AJAD? MINE KOOLI!");

    let report = annotate_json(tmp.path(), &[&file]);
    assert!(count(&report, "capital_letters") >= 1);
}

#[test]
fn annotate_text_output_shows_score() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "jaaaa ma tulen");

    cmd()
        .args(["--color", "never", "annotate", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("letter_reps"));
}

#[test]
fn plain_text_reports_unscored_categories() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "jaaaa ma tulen");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--color", "never", "annotate", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "not scored (no layer): missing_commas, unknown_words",
        ))
        .stderr(predicate::str::contains("categories not scored"));

    let report = annotate_json(tmp.path(), &[&file]);
    assert_eq!(report["skipped"][0], "missing_commas");
    assert_eq!(report["skipped"][1], "unknown_words");
}

#[test]
fn disabled_categories_are_omitted() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "tere!!!!kuidas läheb????");

    let report = annotate_json(
        tmp.path(),
        &[&file, "--enable", "punct_reps", "--disable", "punct_reps,no_spaces"],
    );

    assert_eq!(count(&report, "punct_reps"), 0);
    assert_eq!(count(&report, "no_spaces"), 0);
    let counts = &report["units"][0]["counts"];
    assert!(counts.get("punct_reps").is_none());
    assert!(counts.get("no_spaces").is_none());
}

#[test]
fn paragraph_unit_splits_counts() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "jaaaa\n\nei");

    let report = annotate_json(tmp.path(), &[&file, "--unit", "paragraph"]);
    let units = report["units"].as_array().unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["counts"]["letter_reps"], 1);
    assert_eq!(units[1]["counts"]["letter_reps"], 0);
}

#[test]
fn empty_text_has_null_score() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "empty.txt", "");

    let report = annotate_json(tmp.path(), &[&file]);
    assert!(report["score"].is_null());
    assert_eq!(report["word_count"], 0);
}

#[test]
fn multiple_files_produce_an_array() {
    let tmp = TempDir::new().unwrap();
    let a = write(tmp.path(), "a.txt", "jaaaa");
    let b = write(tmp.path(), "b.txt", "ei");

    let report = annotate_json(tmp.path(), &[&a, &b]);
    let reports = report.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(count(&reports[0], "letter_reps"), 1);
    assert_eq!(count(&reports[1], "letter_reps"), 0);
}

// =============================================================================
// Annotate: layered documents
// =============================================================================

#[test]
fn annotate_layered_document_finds_missing_comma() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "doc.json", LAYERED_DOC);

    let report = annotate_json(tmp.path(), &[&file]);
    let annotations = report["annotations"].as_array().unwrap();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["category"], "missing_commas");
    assert_eq!(annotations[0]["start"], 6);
    assert_eq!(annotations[0]["end"], 10);
    assert_eq!(report["word_count"], 4);
    assert_eq!(report["score"], 0.25);
}

#[test]
fn document_without_required_layer_fails() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "doc.json", r#"{"text": "tere", "words": []}"#);

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("clauses"));
}

#[test]
fn invalid_json_document_fails() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "doc.json", "not json");

    cmd()
        .args(["annotate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid JSON document"));
}

// =============================================================================
// Annotate: gates and limits
// =============================================================================

#[test]
fn max_score_gate_fails_noisy_text() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "jaaaa neeeii");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", &file, "--max-score", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scores"));
}

#[test]
fn max_score_gate_passes_clean_text() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "ma tulen homme");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", &file, "--max-score", "0.5"])
        .assert()
        .success();
}

#[test]
fn oversized_input_is_rejected() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".weblang.toml"), "max_input_bytes = 4\n").unwrap();
    let file = write(tmp.path(), "chat.txt", "tere tere tere");

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

#[test]
fn unknown_category_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "chat.txt", "tere");

    cmd()
        .args(["annotate", &file, "--enable", "punct_rep"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_file_fails() {
    cmd()
        .args(["annotate", "/nonexistent/chat.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// =============================================================================
// Categories Command
// =============================================================================

#[test]
fn categories_lists_all_names() {
    cmd()
        .args(["--color", "never", "categories"])
        .assert()
        .success()
        .stdout(predicate::str::contains("punct_reps"))
        .stdout(predicate::str::contains("unknown_words"));
}

#[test]
fn categories_json_reports_state() {
    let tmp = TempDir::new().unwrap();
    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "categories"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 12);
    assert_eq!(list[0]["name"], "punct_reps");
    assert_eq!(list[0]["enabled"], false);
    assert_eq!(list[10]["requires"], "clauses");
    assert_eq!(list[10]["kind"], "heuristic");
    assert_eq!(list[1]["kind"], "pattern");
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn annotate_requires_a_file() {
    cmd()
        .arg("annotate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
