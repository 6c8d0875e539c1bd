//! Integration tests for the `viscal` CLI binary.
//!
//! Every run pins `--now` to Monday 2026-03-02 09:10 in Vancouver so agendas and
//! layouts are reproducible.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOW: &str = "2026-03-02T09:10:00-08:00";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: a `viscal` command with the fixed clock already applied.
fn viscal() -> Command {
    let mut cmd = Command::cargo_bin("viscal").unwrap();
    cmd.args(["--now", NOW]);
    cmd
}

/// Helper: copy a fixture somewhere writable.
fn scratch_copy(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::copy(fixture(name), &path).unwrap();
    path
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// agenda
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn agenda_lists_reference_day_across_calendars() {
    viscal()
        .args(["agenda", &fixture("work.ics"), &fixture("home.ics")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Monday 2026-03-02\n"))
        .stdout(predicate::str::contains("09:00-09:30    30m  Standup  [work]"))
        .stdout(predicate::str::contains("12:00-13:00     1h  Lunch  [work]"))
        .stdout(predicate::str::contains("18:00-19:00     1h  Gym  [home]"))
        .stdout(predicate::str::contains("all day             Offsite  [home]"))
        .stdout(predicate::str::contains("Retro").not());
}

#[test]
fn agenda_is_in_start_order() {
    let out = stdout_of(viscal().args(["agenda", &fixture("work.ics"), &fixture("home.ics")]));
    let order: Vec<usize> = ["Offsite", "Breakfast", "Standup", "Review", "Lunch", "Gym"]
        .iter()
        .map(|s| out.find(s).unwrap_or_else(|| panic!("{s} missing from:\n{out}")))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order:\n{out}");
}

#[test]
fn agenda_of_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(viscal().args(["agenda", dir.path().join("new.ics").to_str().unwrap()]));
    assert_eq!(out, "Monday 2026-03-02\n");
}

#[test]
fn agenda_requires_files() {
    viscal().arg("agenda").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// replay
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn replay_open_below_and_write() {
    let dir = TempDir::new().unwrap();
    let work = scratch_copy(&dir, "work.ics");

    viscal()
        .args(["replay", "--write", "--keys", "gjoPlanning<CR>", work.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved 1 calendar(s)"))
        .stdout(predicate::str::contains("09:30-10:00    30m  Planning  [work]"))
        .stdout(predicate::str::contains("10:00-10:30    30m  Review  [work]"));

    // the new event and the pushed one are on disk
    viscal()
        .args(["agenda", work.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:30-10:00    30m  Planning  [work]"))
        .stdout(predicate::str::contains("10:00-10:30    30m  Review  [work]"))
        .stdout(predicate::str::contains("09:00-09:30    30m  Standup  [work]"));

    // unmanaged properties survive the rewrite
    assert!(fs::read_to_string(&work).unwrap().contains("LOCATION:Room 4"));
}

#[test]
fn replay_without_write_leaves_files_alone() {
    let dir = TempDir::new().unwrap();
    let work = scratch_copy(&dir, "work.ics");
    let before = fs::read_to_string(&work).unwrap();

    viscal()
        .args(["replay", "--keys", "gjx<C-s>", work.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Standup").not());

    assert_eq!(fs::read_to_string(&work).unwrap(), before);
}

#[test]
fn replay_marks_selection_and_nudges() {
    viscal()
        .args(["replay", "--keys", "gj3J", &fixture("work.ics")])
        .assert()
        .success()
        .stdout(predicate::str::contains("> 09:15-09:45    30m  Standup  [work]"));
}

#[test]
fn replay_shows_open_edit() {
    viscal()
        .args(["replay", "--keys", "gjA<BS><BS>", &fixture("work.ics")])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- editing: Stand --"));
}

#[test]
fn replay_function_key_hides_calendar() {
    viscal()
        .args(["replay", "--keys", "<F2>", &fixture("work.ics"), &fixture("home.ics")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym").not())
        .stdout(predicate::str::contains("Standup"));
}

#[test]
fn replay_rejects_bad_key_script() {
    viscal()
        .args(["replay", "--keys", "<Hyper-x>", &fixture("work.ics")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid key script"));
}

// ─────────────────────────────────────────────────────────────────────────────
// layout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn layout_is_json() {
    let out = stdout_of(viscal().args([
        "layout",
        "--width",
        "618",
        "--height",
        "1000",
        &fixture("work.ics"),
        &fixture("home.ics"),
    ]));
    let layout: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(layout["zoom"], 5.0);
    let items = layout["items"].as_array().unwrap();
    let standup = items.iter().find(|i| i["summary"] == "Standup").unwrap();
    assert_eq!(standup["kind"], "timed");
    assert_eq!(standup["label"], "30m");
    let offsite = items.iter().find(|i| i["summary"] == "Offsite").unwrap();
    assert_eq!(offsite["kind"], "all_day");
    assert!(layout["grid"].as_array().is_some_and(|g| !g.is_empty()));
}

// ─────────────────────────────────────────────────────────────────────────────
// global flags
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn config_file_sets_zoom() {
    let out = stdout_of(viscal().args([
        "--config",
        &fixture("zoom.toml"),
        "layout",
        &fixture("work.ics"),
    ]));
    let layout: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(layout["zoom"], 2.0);
}

#[test]
fn bad_timezone_in_config_fails() {
    viscal()
        .args(["--config", &fixture("bad-timezone.toml"), "agenda", &fixture("work.ics")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn missing_config_file_fails() {
    viscal()
        .args(["--config", "/nonexistent/viscal.toml", "agenda", &fixture("work.ics")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}

#[test]
fn now_must_be_rfc3339() {
    Command::cargo_bin("viscal")
        .unwrap()
        .args(["--now", "tomorrow", "agenda", &fixture("work.ics")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}
