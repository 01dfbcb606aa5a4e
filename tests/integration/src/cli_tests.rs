//! CLI smoke tests
//!
//! Drive the `tunesync` binary end-to-end in batch mode.

use assert_cmd::Command;
use predicates::prelude::*;
use tunesync_test_utils::TestLibrary;

fn tunesync() -> Command {
    let mut cmd = Command::cargo_bin("tunesync").expect("tunesync binary should build");
    // Keep a developer's real ~/.tunesync.toml out of the test runs.
    cmd.env("HOME", std::env::temp_dir());
    cmd
}

#[test]
fn batch_copy_run_succeeds() {
    let library = TestLibrary::new();
    library.add_source("Artist/Song.mp3", b"audio");

    tunesync()
        .arg("--audio-src")
        .arg(library.source_root())
        .arg("--audio-dest")
        .arg(library.dest_root())
        .args(["--mode", "copy", "--batch", "--jobs", "1"])
        .assert()
        .success();

    assert_eq!(library.read_dest("Artist/Song.mp3"), b"audio");
}

#[test]
fn empty_source_fails_with_error() {
    let library = TestLibrary::new();

    tunesync()
        .arg("--audio-src")
        .arg(library.source_root())
        .arg("--audio-dest")
        .arg(library.dest_root())
        .args(["--mode", "copy", "--batch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files"));
}

#[test]
fn missing_required_arguments_fail() {
    let library = TestLibrary::new();

    tunesync()
        .arg("--audio-src")
        .arg(library.source_root())
        .arg("--batch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("audio-dest"));
}

#[test]
fn nonexistent_source_directory_fails() {
    let library = TestLibrary::new();

    tunesync()
        .args(["--audio-src", "/nonexistent/library"])
        .arg("--audio-dest")
        .arg(library.dest_root())
        .arg("--batch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("audio-src"));
}
