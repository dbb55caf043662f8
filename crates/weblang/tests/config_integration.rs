//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary. Tests use
//! `info --json` to assert actual config values, not just process success.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run `info --json` from a directory and parse the JSON output.
fn info_json(dir: &std::path::Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(
        json["config"]["log_level"], "info",
        "should use default log level"
    );
    assert!(
        json["config"]["config_file"].is_null(),
        "no config file should be reported"
    );
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join(".weblang.toml");
    fs::write(&config_path, r#"log_level = "debug""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "debug");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with(".weblang.toml"),
        "should report dotfile: {reported}"
    );
}

#[test]
fn discovers_regular_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("weblang.toml");
    fs::write(&config_path, r#"log_level = "warn""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "warn");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with("weblang.toml"),
        "should report regular config: {reported}"
    );
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("nested").join("deep");
    fs::create_dir_all(&sub_dir).unwrap();

    // Config in root, run from nested/deep
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["log_level"], "debug");
    assert!(
        json["config"]["config_file"].as_str().is_some(),
        "should find parent config"
    );
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();

    // Both configs exist; the regular file merges last and wins
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join("weblang.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(
        json["config"]["log_level"], "error",
        "regular file should override dotfile"
    );
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_toml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "warn""#).unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "warn");
}

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".weblang.yaml"), "log_level: warn\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "warn");
}

#[test]
fn parses_yml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".weblang.yml"), "log_level: debug\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "debug");
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.json"),
        r#"{"log_level": "error"}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "error");
}

// =============================================================================
// Config Precedence
// =============================================================================

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("project");
    fs::create_dir_all(&sub_dir).unwrap();

    // Parent config (error) vs child config (debug): child should win
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "error""#).unwrap();
    fs::write(sub_dir.join(".weblang.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(
        json["config"]["log_level"], "debug",
        "closer config should win"
    );
}

#[test]
fn later_extension_overrides_earlier_in_same_directory() {
    let tmp = TempDir::new().unwrap();

    // Both dotfiles exist; YAML merges after TOML
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join(".weblang.yaml"), "log_level: error\n").unwrap();

    let json = info_json(tmp.path());
    assert_eq!(
        json["config"]["log_level"], "error",
        "later extension (YAML) should override earlier (TOML) in merge"
    );
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();

    // Project config sets debug
    fs::write(tmp.path().join(".weblang.toml"), r#"log_level = "debug""#).unwrap();

    // Explicit config sets error
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, r#"log_level = "error""#).unwrap();

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["config"]["log_level"], "error",
        "--config should override discovered config"
    );
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(
        reported.ends_with("override.toml"),
        "--config path should be reported: {reported}"
    );
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "this is not valid toml [[[",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration").or(predicate::str::contains("config")));
}

#[test]
fn invalid_yaml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.yaml"),
        "invalid:\n  yaml\n content:\n[broken",
    )
    .unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn invalid_json_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".weblang.json"), "{not valid json}").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure();
}

#[test]
fn unknown_config_field_is_ignored() {
    // Figment ignores unknown fields by default with serde
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "log_level = \"info\"\nunknown_field = \"should be ignored\"\nanother_unknown = 42\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "info");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();

    // Structure: /tmp/parent/.project.toml + /tmp/parent/repo/.git/ + /tmp/parent/repo/src/
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    // Config in parent (outside repo)
    fs::write(parent.join(".weblang.toml"), r#"log_level = "error""#).unwrap();

    // .git directory marks repo boundary
    fs::create_dir(repo.join(".git")).unwrap();

    // Running from src/ should NOT find parent config (stopped at .git)
    let json = info_json(&src);

    assert_eq!(
        json["config"]["log_level"], "info",
        "boundary should stop the search"
    );
    assert!(
        json["config"]["config_file"].is_null(),
        "should not find config beyond boundary"
    );
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    // .git and config in same directory
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".weblang.toml"), r#"log_level = "debug""#).unwrap();

    // Running from src/ should find the repo config
    let json = info_json(&src);

    assert_eq!(
        json["config"]["log_level"], "debug",
        "config next to .git should be found"
    );
    assert!(
        json["config"]["config_file"].as_str().is_some(),
        "should report config file"
    );
}

// =============================================================================
// Annotation Settings
// =============================================================================

/// Write `text` to `chat.txt` in `dir` and run `annotate --json` on it.
fn annotate_json(dir: &std::path::Path, text: &str, envs: &[(&str, &str)]) -> Value {
    let file = dir.join("chat.txt");
    fs::write(&file, text).unwrap();
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "--json", "annotate"])
        .arg(&file)
        .envs(envs.iter().copied())
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn count(report: &Value, category: &str) -> usize {
    report["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["category"] == category)
        .count()
}

#[test]
fn default_annotation_settings_are_reported() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["unit"], "document");
    let enabled = json["config"]["enabled_categories"].as_array().unwrap();
    assert_eq!(enabled.len(), 11);
    assert!(!enabled.iter().any(|c| c == "punct_reps"));
}

#[test]
fn env_var_sets_unit() {
    let tmp = TempDir::new().unwrap();
    let report = annotate_json(tmp.path(), "jaaaa\n\nei", &[("WEBLANG_UNIT", "paragraph")]);
    assert_eq!(report["units"].as_array().unwrap().len(), 2);
}

#[test]
fn category_toggle_enables_punct_reps() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "[categories]\npunct_reps = true\n",
    )
    .unwrap();

    let report = annotate_json(tmp.path(), "mis???", &[]);
    assert_eq!(count(&report, "punct_reps"), 1);
}

#[test]
fn category_toggle_disables_letter_reps() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "[categories]\nletter_reps = false\n",
    )
    .unwrap();

    let report = annotate_json(tmp.path(), "jaaaa", &[]);
    assert_eq!(count(&report, "letter_reps"), 0);
    assert!(report["units"][0]["counts"].get("letter_reps").is_none());
}

#[test]
fn relative_lexicon_file_is_resolved_against_config() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    let work = project.join("work");
    fs::create_dir_all(&work).unwrap();
    fs::write(project.join("z.txt"), "zumba\n").unwrap();
    fs::write(
        project.join(".weblang.toml"),
        "[lexicon]\nz_words_file = \"z.txt\"\n",
    )
    .unwrap();

    let report = annotate_json(&work, "zumba pizza", &[]);
    assert_eq!(count(&report, "foreign_z_letters"), 1);
}

#[test]
fn missing_lexicon_file_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "[lexicon]\nforeign_words_file = \"missing.txt\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("chat.txt"), "tere").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", "chat.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read lexicon file"));
}

#[test]
fn extra_rule_from_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.yaml"),
        "rules:\n  - category: letter_reps\n    pattern: '\\blol\\b'\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["extra_rules"], 1);

    let report = annotate_json(tmp.path(), "see on lol", &[]);
    let hits: Vec<&Value> = report["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["category"] == "letter_reps")
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["start"], 7);
    assert_eq!(hits[0]["end"], 10);
}

#[test]
fn invalid_rule_pattern_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "[[rules]]\ncategory = \"letter_reps\"\npattern = \"(unclosed\"\n",
    )
    .unwrap();
    fs::write(tmp.path().join("chat.txt"), "tere").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", "chat.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn config_max_score_gates_annotate() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".weblang.toml"), "max_score = 0.1\n").unwrap();
    fs::write(tmp.path().join("chat.txt"), "jaaaa").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "annotate", "chat.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max: 0.100"));
}

#[test]
fn disable_input_limit_removes_max_bytes() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".weblang.toml"),
        "max_input_bytes = 4\ndisable_input_limit = true\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert!(json["config"]["max_input_bytes"].is_null());

    let report = annotate_json(tmp.path(), "tere tere tere", &[]);
    assert_eq!(report["word_count"], 3);
}
