//! Integration tests for the Vellum CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_STF: &str = "%stf short;\n\
Title: A Winter Tale\n\
Unique-URL: https://example.org/winter-tale\n\
Creator: Jim Smith\n\
\n\
It began to snow at dusk.\n\
\n\
#\n\
\n\
^map.png\n\
>The map\n";

/// Write a sample manuscript (and its image) into a directory
fn create_sample(dir: &TempDir) -> std::path::PathBuf {
    let stf = dir.path().join("tale.stf");
    fs::write(&stf, SAMPLE_STF).expect("Failed to write test file");
    fs::write(dir.path().join("map.png"), b"\x89PNG fake body")
        .expect("Failed to write test image");
    stf
}

fn vellum() -> Command {
    Command::cargo_bin("vellum").unwrap()
}

#[test]
fn test_help() {
    vellum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("pack"))
        .stdout(predicate::str::contains("unpack"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_version() {
    vellum()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vellum"));
}

#[test]
fn test_pack_and_unpack_round_trip() {
    let dir = TempDir::new().unwrap();
    let stf = create_sample(&dir);
    let pack_path = dir.path().join("tale.stfpack");

    vellum()
        .args([
            "pack",
            stf.to_str().unwrap(),
            "-o",
            pack_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packed 'A Winter Tale'"));

    let out_dir = dir.path().join("out");
    vellum()
        .args([
            "unpack",
            pack_path.to_str().unwrap(),
            "-o",
            out_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 images"));

    let manuscript = fs::read_to_string(out_dir.join("manuscript.stf")).unwrap();
    assert!(manuscript.starts_with("%stf short;"));
    assert!(manuscript.contains("It began to snow at dusk."));
    assert!(manuscript.contains("^img-001.png"));
    assert_eq!(
        fs::read(out_dir.join("img-001.png")).unwrap(),
        b"\x89PNG fake body"
    );
}

#[test]
fn test_info_stf() {
    let dir = TempDir::new().unwrap();
    let stf = create_sample(&dir);

    vellum()
        .args(["info", stf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("A Winter Tale"))
        .stdout(predicate::str::contains("Format:     short"))
        .stdout(predicate::str::contains("Images:     1"));
}

#[test]
fn test_info_json() {
    let dir = TempDir::new().unwrap();
    let stf = create_sample(&dir);

    let output = vellum()
        .args(["info", stf.to_str().unwrap(), "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["title"], "A Winter Tale");
    assert_eq!(value["images"], 1);
    assert_eq!(value["creators"][0], "Jim Smith");
}

#[test]
fn test_validate_good_and_bad() {
    let dir = TempDir::new().unwrap();
    let stf = create_sample(&dir);

    vellum()
        .args(["validate", stf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid short manuscript"));

    let bad = dir.path().join("bad.stf");
    fs::write(&bad, "%stf short;\nTitle: No URL\n\n").unwrap();
    vellum()
        .args(["validate", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manuscript"));
}

#[test]
fn test_pack_missing_input() {
    vellum()
        .args(["pack", "missing.stf", "-o", "out.stfpack"])
        .assert()
        .failure();
}

#[test]
fn test_unrecognized_extension() {
    vellum()
        .args(["info", "book.epub"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized input extension"));
}

#[test]
fn test_pack_failure_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.stf");
    // Image reference without its caption
    fs::write(&bad, "%stf short;\nTitle: T\nUnique-URL: u\n\n^map.png\n").unwrap();
    let out = dir.path().join("bad.stfpack");

    vellum()
        .args(["pack", bad.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .failure();
    assert!(!out.exists());
}
