//! CLI integration tests using assert_cmd to exercise the actual binary.
//!
//! Nothing here embeds text, so no model is ever fetched.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dlp_guard() -> Command {
    Command::cargo_bin("dlp-guard").unwrap()
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn cli_analyze_masks_phone_number() {
    dlp_guard()
        .args(["analyze", "내 번호는 010-1234-5678 입니다"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""maskedText": "내 번호는 *** 입니다""#))
        .stdout(predicate::str::contains(r#""status": "danger""#))
        .stdout(predicate::str::contains("010-1234-5678"));
}

#[test]
fn cli_analyze_reads_stdin() {
    dlp_guard()
        .arg("analyze")
        .write_stdin("오늘 회의는 취소되었습니다")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "safe""#));
}

#[test]
fn cli_analyze_reads_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("memo.txt");
    fs::write(&file, "contact test@example.com").unwrap();

    dlp_guard()
        .arg("analyze")
        .arg("--file")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("test@example.com"))
        .stdout(predicate::str::contains(r#""maskedText": "contact ***""#));
}

#[test]
fn cli_analyze_rejects_empty_text() {
    dlp_guard()
        .args(["analyze", ""])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""success": false"#))
        .stdout(predicate::str::contains("invalid input"));
}

// ---------------------------------------------------------------------------
// decide / index
// ---------------------------------------------------------------------------

#[test]
fn cli_decide_without_index_fails() {
    let tmp = TempDir::new().unwrap();

    dlp_guard()
        .args(["decide", "some confidential text"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""success": false"#))
        .stdout(predicate::str::contains("index not initialized"));
}

#[test]
fn cli_index_load_without_index() {
    let tmp = TempDir::new().unwrap();

    dlp_guard()
        .args(["index", "load"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success": true"#))
        .stdout(predicate::str::contains("no index found"));
}

#[test]
fn cli_index_init_on_empty_folder_fails() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("sanitized")).unwrap();

    dlp_guard()
        .args(["index", "init"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("no valid documents found"));

    assert!(!tmp.path().join("dictionary").join("vector_index.json").exists());
}

#[test]
fn cli_index_add_rejects_missing_folder() {
    let tmp = TempDir::new().unwrap();

    dlp_guard()
        .args(["index", "add", "--path", "does-not-exist"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("not a directory"));
}

#[test]
fn cli_rejects_inverted_thresholds() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".dlp-guard")).unwrap();
    fs::write(
        tmp.path().join(".dlp-guard/config.yml"),
        "similarity:\n  danger_threshold: 0.9\n  critical_threshold: 0.85\n",
    )
    .unwrap();

    dlp_guard()
        .args(["index", "load"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid config"));
}

#[test]
fn cli_missing_explicit_config_fails() {
    let tmp = TempDir::new().unwrap();

    dlp_guard()
        .args(["index", "load", "--config", "nope.yml"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("file not found"));
}

// ---------------------------------------------------------------------------
// extract
// ---------------------------------------------------------------------------

#[test]
fn cli_extract_previews_text_files() {
    let tmp = TempDir::new().unwrap();
    let docs = tmp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("short.txt"), "hello preview").unwrap();
    fs::write(docs.join("long.txt"), "x".repeat(600)).unwrap();

    let long_preview = format!("{}...", "x".repeat(500));
    dlp_guard()
        .arg("extract")
        .arg(&docs)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello preview"))
        .stdout(predicate::str::contains(long_preview));
}
