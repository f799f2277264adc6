//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective. Tests that
//! need a repository build a throwaway one in a temp directory and only
//! ever run the binary in debug mode, so nothing is pushed anywhere.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .is_ok()
}

/// Build a throwaway git repository with one commit.
fn init_repo(dir: &Path) {
    let git = |args: &[&str]| {
        let status = std::process::Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .expect("git should run");
        assert!(
            status.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&status.stderr)
        );
    };
    git(&["init", "-q"]);
    git(&["config", "user.email", "ci@example.com"]);
    git(&["config", "user.name", "ci"]);
    std::fs::write(dir.join("README.md"), "# test\n").unwrap();
    git(&["add", "."]);
    git(&["commit", "-q", "-m", "init"]);
}

fn tag_repo(dir: &Path, name: &str) {
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["tag", "-a", name, "-m", name])
        .output()
        .expect("git should run");
    assert!(status.status.success());
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Options:"))
        .stdout(predicate::str::contains("--debug"))
        .stdout(predicate::str::contains("--silence"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .arg("-C")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist"])
        .assert()
        .failure();
}

// =============================================================================
// Debug Mode (no side effects)
// =============================================================================

#[test]
fn missing_tag_section_is_a_noop() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".tagflow.toml"), "log_level = \"info\"\n").unwrap();
    if !git_available() {
        return;
    }
    init_repo(tmp.path());

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));
}

#[test]
fn debug_previews_first_tag() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\n",
    )
    .unwrap();

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["-d", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DEBUG"))
        .stdout(predicate::str::contains("1.0.0-prod-1"));

    // Nothing was written or tagged.
    assert!(!tmp.path().join("VERSION").exists());
}

#[test]
fn debug_previews_next_tag() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    tag_repo(tmp.path(), "1.0.0-prod-1");
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\n",
    )
    .unwrap();

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["-d", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0.0-prod-2"));
}

#[test]
fn debug_json_outputs_valid_json() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\n",
    )
    .unwrap();

    let output = cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["-d", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("--json should output valid JSON");
    assert_eq!(json["outcome"], "debug_preview");
    assert_eq!(json["context"]["tag"], "1.0.0-prod-1");
}

#[test]
fn branch_gate_skips_without_mutating() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\nallow_branches = [\"release-only\"]\n",
    )
    .unwrap();

    // Not in debug mode, but the branch gate stops the run before any
    // side effect.
    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not in the tag allow-list"));
    assert!(!tmp.path().join("VERSION").exists());
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\n",
    )
    .unwrap();

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["-q", "-d"])
        .assert()
        .success();
}

#[test]
fn verbose_flags_accepted() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    std::fs::write(
        tmp.path().join(".tagflow.toml"),
        "[tag]\nfirst_tag = \"1.0.0-prod-1\"\n",
    )
    .unwrap();

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["-vv", "-d"])
        .assert()
        .success();
}

#[test]
fn explicit_config_file_overrides_discovery() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    init_repo(tmp.path());
    let config_path = tmp.path().join("custom.toml");
    std::fs::write(&config_path, "[tag]\nfirst_tag = \"2.0.0-dev-1\"\n").unwrap();

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("--config")
        .arg(&config_path)
        .args(["-d", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.0.0-dev-1"));
}
