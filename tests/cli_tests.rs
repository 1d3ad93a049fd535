//! CLI integration tests

use std::process::Command;

use tempfile::TempDir;

fn voice_notes_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice-notes"))
}

#[test]
fn help_output() {
    let output = voice_notes_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice notes"));
    assert!(stdout.contains("record"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("search"));
    assert!(stdout.contains("play"));
    assert!(stdout.contains("rename"));
    assert!(stdout.contains("delete"));
    assert!(stdout.contains("--storage-dir"));
}

#[test]
fn version_output() {
    let output = voice_notes_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-notes"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = voice_notes_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-notes"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voice_notes_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_get_rejects_unknown_keys() {
    let output = voice_notes_bin()
        .args(["config", "get", "bogus_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key"),
        "Expected unknown-key error, got: {}",
        stderr
    );
}

#[test]
fn list_on_empty_storage() {
    let dir = TempDir::new().unwrap();
    let output = voice_notes_bin()
        .args(["list", "--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No recordings yet"),
        "Expected empty-state hint, got: {}",
        stderr
    );
}

#[test]
fn list_shows_stored_notes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("standup.m4a"), b"audio bytes").unwrap();
    std::fs::write(dir.path().join("skipped.txt"), b"not audio").unwrap();

    let output = voice_notes_bin()
        .args(["list", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("standup"));
    assert!(!stdout.contains("skipped"));
}

#[test]
fn search_filters_notes() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("standup.m4a"), b"a").unwrap();
    std::fs::write(dir.path().join("groceries.m4a"), b"b").unwrap();

    let output = voice_notes_bin()
        .args(["search", "STAND", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("standup"));
    assert!(!stdout.contains("groceries"));
}

#[test]
fn delete_removes_the_backing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.m4a");
    std::fs::write(&path, b"audio bytes").unwrap();

    let output = voice_notes_bin()
        .args(["delete", "todo", "-y", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(!path.exists());
}

#[test]
fn rename_rejects_blank_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.m4a");
    std::fs::write(&path, b"audio bytes").unwrap();

    let output = voice_notes_bin()
        .args(["rename", "todo", "   ", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("empty"),
        "Expected empty-name error, got: {}",
        stderr
    );
    assert!(path.exists());
}

#[test]
fn rename_moves_the_note() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("todo.m4a"), b"audio bytes").unwrap();

    let output = voice_notes_bin()
        .args(["rename", "todo", "done", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(!dir.path().join("todo.m4a").exists());
    assert!(dir.path().join("done.m4a").exists());
}

#[test]
fn unknown_note_reports_an_error() {
    let dir = TempDir::new().unwrap();

    let output = voice_notes_bin()
        .args(["delete", "ghost", "-y", "--no-probe"])
        .args(["--storage-dir", dir.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No voice note named"),
        "Expected missing-note error, got: {}",
        stderr
    );
}
