//! Runs the `accord` binary against documents on disk.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const RULES: &str = "\
default: true
rules:
  - mainname: GPL-2.0-only
    subname: MIT
    compatibility: false
  - mainname: MIT
    subtype: copyleft
    compatibility: true
";

const TYPES: &str = "\
shortname,licensetype
MIT,permissive
GPL-2.0-only,copyleft
BSD-3-Clause,permissive
";

const INPUT: &str = r#"{"results": [
    {"file": "main.c", "licenses": ["MIT", "GPL-2.0-only"]}
]}"#;

fn write_documents(dir: &Path) {
    std::fs::write(dir.join("rules.yaml"), RULES).unwrap();
    std::fs::write(dir.join("types.csv"), TYPES).unwrap();
    std::fs::write(dir.join("input.json"), INPUT).unwrap();
}

fn accord(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_accord"))
        .current_dir(dir)
        .env("ACCORD_LOG", "off")
        .args(["scan", "--file", "input.json", "--rules", "rules.yaml", "--types", "types.csv"])
        .args(extra)
        .output()
        .unwrap()
}

#[test]
fn text_scan_fires_name_rule_only() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path());

    let out = accord(dir.path(), &["--workers", "1"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        String::from_utf8(out.stdout).unwrap(),
        "----main.c----\n\
         MIT,GPL-2.0-only :: false\n\
         ----all licenses with their compatibility----\n\
         MIT,GPL-2.0-only :: false\n"
    );
}

#[test]
fn json_scan_is_a_valid_array() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path());

    let out = accord(dir.path(), &["--json"]);

    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert!(text.starts_with("[\n  {\"file\":\"main.c\""), "{text}");
    assert!(text.ends_with("\n]\n"), "{text}");
}

#[test]
fn missing_input_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();
    write_documents(dir.path());
    std::fs::remove_file(dir.path().join("input.json")).unwrap();

    let out = accord(dir.path(), &[]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input document"));
}
