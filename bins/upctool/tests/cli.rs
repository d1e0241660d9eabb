use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const LAYOUT: &str = r#"{
    "cells": [
        { "x": 0, "y": 0, "metal": { "placement": "R", "via": true },
          "silicon": { "kind": "n", "placement": "D" } },
        { "x": 1, "y": 0, "metal": { "placement": "LR" } },
        { "x": 2, "y": 0, "metal": { "placement": "L" } },
        { "x": 0, "y": -1, "silicon": { "kind": "n", "placement": "U" } }
    ],
    "modules": [{ "name": "ignored" }]
}"#;

fn upctool() -> Command {
    Command::cargo_bin("upctool").unwrap()
}

#[test]
fn import_info_and_trace() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("layout.json");
    fs::write(&json, LAYOUT).unwrap();

    upctool()
        .arg("import")
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 4 cells"));
    let buffer = dir.path().join("layout.upcb");
    assert!(buffer.exists());

    upctool()
        .arg("info")
        .arg(&buffer)
        .assert()
        .success()
        .stdout(predicate::str::contains("cells: 4"))
        .stdout(predicate::str::contains("bounds: (0, -1) to (2, 0)"))
        .stdout(predicate::str::contains("no issues"));

    upctool()
        .args(["trace", "--x", "2", "--y", "0"])
        .arg(&buffer)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("5 atoms"))
        .stdout(predicate::str::contains("(0, -1) si"));

    upctool()
        .args(["trace", "--x", "1", "--y", "-1", "--part", "si"])
        .arg(&buffer)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no si at (1, -1)"));
}

#[test]
fn base64_conversion() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("layout.json");
    let binary = dir.path().join("out/layout.upcb");
    fs::write(&json, LAYOUT).unwrap();
    upctool()
        .arg("import")
        .arg(&json)
        .arg("-o")
        .arg(&binary)
        .assert()
        .success();

    let output = upctool().arg("to-base64").arg(&binary).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.trim().starts_with("VVBDQ"));

    upctool()
        .args(["info", "-b", text.trim()])
        .assert()
        .success()
        .stdout(predicate::str::contains("cells: 4"));

    let copy = dir.path().join("copy.upcb");
    upctool()
        .args(["from-base64", text.trim(), "-o"])
        .arg(&copy)
        .assert()
        .success();
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&binary).unwrap());
}

#[test]
fn rejects_bad_input() {
    let dir = tempdir().unwrap();
    let junk = dir.path().join("junk.upcb");
    fs::write(&junk, b"not a buffer").unwrap();
    upctool()
        .arg("info")
        .arg(&junk)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode buffer"));

    let json = dir.path().join("bad.json");
    fs::write(&json, r#"{ "cells": [{ "x": 0, "y": 0, "silicon": { "kind": "q" } }] }"#)
        .unwrap();
    upctool()
        .arg("import")
        .arg(&json)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to import legacy layout"));
}
