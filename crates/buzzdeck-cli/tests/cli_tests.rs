//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn buzzdeck() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("buzzdeck").unwrap()
}

fn write_pairs_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("pairs.json");
    std::fs::write(
        &path,
        r#"[
            {"question": "What is the powerhouse of the cell?", "answer": "mitochondria"},
            {"question": "What gas do plants absorb during photosynthesis?", "answer": "carbon dioxide"}
        ]"#,
    )
    .unwrap();
    path
}

#[test]
fn help_output() {
    buzzdeck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed reveal quiz trainer"));
}

#[test]
fn version_output() {
    buzzdeck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("buzzdeck"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created buzzdeck.toml"));

    assert!(dir.path().join("buzzdeck.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    buzzdeck().current_dir(dir.path()).arg("init").assert().success();
    buzzdeck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn rating_defaults_to_1000() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "rating"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rating: 1000"));
}

#[test]
fn stats_start_at_default_rating() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rating:        1000"))
        .stdout(predicate::str::contains("Games played:  0"));
}

#[test]
fn sets_add_list_show_round_trip() {
    let dir = TempDir::new().unwrap();
    let pairs = write_pairs_file(&dir);

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "add", "--title", "Biology - Cells"])
        .arg("--pairs")
        .arg(&pairs)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"));

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Biology - Cells"))
        .stdout(predicate::str::contains("manual"));

    // Resolve by title via list, then show with the full stored id.
    let raw = std::fs::read_to_string(dir.path().join("data/studySets.json")).unwrap();
    let sets: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = sets[0]["id"].as_str().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "show", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("powerhouse"))
        .stdout(predicate::str::contains("mitochondria"));
}

#[test]
fn sets_delete_removes_the_set() {
    let dir = TempDir::new().unwrap();
    let pairs = write_pairs_file(&dir);

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "add", "--title", "Doomed"])
        .arg("--pairs")
        .arg(&pairs)
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("data/studySets.json")).unwrap();
    let sets: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = sets[0]["id"].as_str().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "delete", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No study sets yet"));
}

#[test]
fn sets_favorite_toggles() {
    let dir = TempDir::new().unwrap();
    let pairs = write_pairs_file(&dir);

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "add", "--title", "Starred"])
        .arg("--pairs")
        .arg(&pairs)
        .assert()
        .success();

    let raw = std::fs::read_to_string(dir.path().join("data/studySets.json")).unwrap();
    let sets: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let id = sets[0]["id"].as_str().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "favorite", id])
        .assert()
        .success()
        .stdout(predicate::str::contains("favorite"));
}

#[test]
fn sets_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "sets", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no study set matches"));
}

#[test]
fn generate_requires_a_source() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "generate", "--title", "Empty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file or --topic"));
}

#[test]
fn generate_rejects_blank_title() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "generate", "--topic", "cells", "--title", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title must not be empty"));
}

#[test]
fn profile_set_and_show() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args([
            "--data-dir", "data", "profile", "set", "--name", "Ada",
            "--email", "ada@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile updated"));

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada"))
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn history_starts_empty() {
    let dir = TempDir::new().unwrap();

    buzzdeck()
        .current_dir(dir.path())
        .args(["--data-dir", "data", "history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No games played yet"));
}

#[test]
fn missing_explicit_config_fails() {
    buzzdeck()
        .args(["--config", "/nonexistent/buzzdeck.toml", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
