//! End-to-end tests for the `sb` binary against a ledger snapshot.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const DAY: i64 = 86_400;
const AS_OF: i64 = 1_000_000;

fn sb_binary() -> String {
    env!("CARGO_BIN_EXE_sb").to_string()
}

/// Writes a snapshot with three stakers:
/// - 0xaa: two Warriors, 2 days each
/// - 0xbb: one Mage, 10 days
/// - 0xcc: one Warrior and two Mages, 1 day each
fn write_snapshot(dir: &Path) -> PathBuf {
    let snapshot = serde_json::json!({
        "as_of": AS_OF,
        "categories": ["Warrior", "Mage"],
        "stakers": [
            {"address": "0xaa", "items": [
                {"id": 1, "category": "Warrior", "staked_at": AS_OF - 2 * DAY},
                {"id": 2, "category": "Warrior", "staked_at": AS_OF - 2 * DAY}
            ]},
            {"address": "0xbb", "items": [
                {"id": 3, "category": "Mage", "staked_at": AS_OF - 10 * DAY}
            ]},
            {"address": "0xcc", "items": [
                {"id": 4, "category": "Warrior", "staked_at": AS_OF - DAY},
                {"id": 5, "category": "Mage", "staked_at": AS_OF - DAY},
                {"id": 6, "category": "Mage", "staked_at": AS_OF - DAY}
            ]}
        ]
    });
    let path = dir.join("ledger.json");
    std::fs::write(&path, snapshot.to_string()).unwrap();
    path
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("sb.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Runs `sb` isolated from the user's config directory and environment.
fn run_sb(temp: &Path, args: &[&str]) -> Output {
    Command::new(sb_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env_remove("SB_PAGE_SIZE")
        .env_remove("SB_FETCH_PAGE_SIZE")
        .env_remove("SB_RPC_URL")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run sb")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "sb should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_categories_from_snapshot() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = run_sb(
        temp.path(),
        &["categories", "--snapshot", snapshot.to_str().unwrap()],
    );
    assert_eq!(stdout(&output), "all\nWarrior\nMage\n");
}

#[test]
fn test_summary_from_snapshot() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = run_sb(
        temp.path(),
        &["summary", "--json", "--snapshot", snapshot.to_str().unwrap()],
    );
    let summary: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();

    // 17 days over 6 items.
    assert_eq!(summary["unique_entities"], 3);
    assert_eq!(summary["total_records"], 6);
    assert_eq!(summary["average_elapsed_days"], 2.8);
    assert_eq!(summary["average_elapsed_whole_days"], 3);
}

#[test]
fn test_list_default_sort_is_longest_first() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = stdout(&run_sb(
        temp.path(),
        &["list", "--snapshot", snapshot.to_str().unwrap()],
    ));
    let bb = output.find("0xbb").unwrap();
    let aa = output.find("0xaa").unwrap();
    let cc = output.find("0xcc").unwrap();
    assert!(bb < aa && aa < cc, "unexpected order:\n{output}");
    assert!(output.contains("  10 days"));
    assert!(output.ends_with("Page 1 of 1\n"));
}

#[test]
fn test_list_pages_with_configured_page_size() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());
    let config = write_config(temp.path(), "page_size = 1\nfetch_page_size = 2\n");

    let output = stdout(&run_sb(
        temp.path(),
        &[
            "list",
            "--sort",
            "count-desc",
            "--page",
            "2",
            "--json",
            "--config",
            config.to_str().unwrap(),
            "--snapshot",
            snapshot.to_str().unwrap(),
        ],
    ));
    let page: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(page["page"], 2);
    assert_eq!(page["page_count"], 3);
    assert_eq!(page["has_next"], true);
    assert_eq!(page["has_prev"], true);
    assert_eq!(page["stakers"][0]["address"], "0xaa");
    assert_eq!(page["stakers"][0]["count"], 2);
}

#[test]
fn test_list_filters_by_category_and_min_days() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = stdout(&run_sb(
        temp.path(),
        &[
            "list",
            "--category",
            "Mage",
            "--min-days",
            "3",
            "--json",
            "--snapshot",
            snapshot.to_str().unwrap(),
        ],
    ));
    let page: serde_json::Value = serde_json::from_str(&output).unwrap();
    let addresses: Vec<_> = page["stakers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["address"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(addresses, vec!["0xbb", "0xcc"]);
}

#[test]
fn test_list_page_past_end_is_clamped() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = stdout(&run_sb(
        temp.path(),
        &["list", "--page", "99", "--snapshot", snapshot.to_str().unwrap()],
    ));
    assert!(output.ends_with("Page 1 of 1\n"));
}

#[test]
fn test_list_unknown_sort_falls_back() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = stdout(&run_sb(
        temp.path(),
        &["list", "--sort", "bogus", "--snapshot", snapshot.to_str().unwrap()],
    ));
    assert!(output.starts_with("STAKERS (category: all, min days: 0, sort: elapsed-desc)"));
}

#[test]
fn test_list_with_no_matches() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());

    let output = stdout(&run_sb(
        temp.path(),
        &["list", "--category", "Dragon", "--snapshot", snapshot.to_str().unwrap()],
    ));
    assert!(output.contains("No stakers found with the current filters"));
}

#[test]
fn test_missing_snapshot_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.json");

    let output = run_sb(temp.path(), &["summary", "--snapshot", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to open snapshot"));
}

#[test]
fn test_zero_page_size_is_rejected() {
    let temp = TempDir::new().unwrap();
    let snapshot = write_snapshot(temp.path());
    let config = write_config(temp.path(), "page_size = 0\n");

    let output = run_sb(
        temp.path(),
        &[
            "list",
            "--config",
            config.to_str().unwrap(),
            "--snapshot",
            snapshot.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load configuration"));
}
