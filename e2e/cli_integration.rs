//! E2E: the `cdb` command-line front end, as a black box.
//!
//! `create`/`get`/`find`/`dump`/`stats` round-trip through the library
//! exactly as the library-level tests do. The CLI is a thin peripheral layer
//! over the library, so these are smoke tests, not core-contract tests.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn cdb_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_cdb") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("cdb");
    p
}

fn run(args: &[&str], stdin: Option<&str>) -> std::process::Output {
    let mut cmd = Command::new(cdb_bin());
    cmd.args(args);
    if stdin.is_some() {
        cmd.stdin(Stdio::piped());
    }
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("failed to spawn cdb");
    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
    }
    child.wait_with_output().expect("failed to wait on cdb")
}

#[test]
fn create_from_stdin_then_get_and_find() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("test.cdb");

    let create = run(
        &["create", db.to_str().unwrap()],
        Some("key1\tvalue1\nkey2\tvalue2\nkey2\tvalue2b\n"),
    );
    assert!(create.status.success(), "create failed: {create:?}");
    assert!(db.exists());

    let get = run(&["get", db.to_str().unwrap(), "key1"], None);
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "value1");

    let find = run(&["find", db.to_str().unwrap(), "key2"], None);
    assert!(find.status.success());
    let mut values: Vec<String> = String::from_utf8_lossy(&find.stdout)
        .lines()
        .map(String::from)
        .collect();
    values.sort();
    assert_eq!(values, vec!["value2".to_string(), "value2b".to_string()]);
}

#[test]
fn get_on_missing_key_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("empty.cdb");
    let create = run(&["create", db.to_str().unwrap()], Some(""));
    assert!(create.status.success());

    let get = run(&["get", db.to_str().unwrap(), "nope"], None);
    assert!(!get.status.success());
}

#[test]
fn dump_prints_every_pair() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("dump.cdb");
    run(
        &["create", db.to_str().unwrap()],
        Some("a\t1\nb\t2\nc\t3\n"),
    );

    let dump = run(&["dump", db.to_str().unwrap()], None);
    assert!(dump.status.success());
    let stdout = String::from_utf8_lossy(&dump.stdout);
    assert!(stdout.contains("a\t1"));
    assert!(stdout.contains("b\t2"));
    assert!(stdout.contains("c\t3"));
}

#[test]
fn stats_reports_record_count() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("stats.cdb");
    run(
        &["create", db.to_str().unwrap()],
        Some("a\t1\nb\t2\nc\t3\nd\t4\n"),
    );

    let stats = run(&["stats", db.to_str().unwrap()], None);
    assert!(stats.status.success());
    let stdout = String::from_utf8_lossy(&stats.stdout);
    assert!(stdout.contains("records:"));
    assert!(stdout.contains("4"));
}

#[test]
fn create_rejects_a_line_missing_the_tab_separator() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("bad.cdb");
    let create = run(&["create", db.to_str().unwrap()], Some("no-tab-here\n"));
    assert!(!create.status.success());
}
