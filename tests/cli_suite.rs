use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

// Helper function to initialize the command to test, isolated from the
// caller's home, settings and install records.
fn meow(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_meow"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("MEOW_STATE_FILE", home.join("info.json"))
        .env("MEOW_API_URL", "http://127.0.0.1:9")
        .env_remove("MEOW_ADMIN_API_KEY")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_command() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Meta package manager"));
}

#[test]
fn test_version_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let expected = format!("meow {}", env!("CARGO_PKG_VERSION"));

    meow(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_unknown_command_prints_usage() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .arg("unknown-command-xyz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: meow"));
}

#[test]
fn test_unknown_explicit_source_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["install", "vim", "-src", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown source 'bogus'"));

    assert!(!temp_dir.path().join("info.json").exists());
}

#[test]
fn test_invalid_package_name_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["install", "vim;rm", "--source", "pac", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid package name"));
}

#[test]
fn test_settings_set_then_get() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["settings", "set", "aur-helper", "paru"])
        .assert()
        .success();

    meow(temp_dir.path())
        .args(["settings", "get", "aur-helper"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aur-helper = paru"));
}

#[test]
fn test_settings_rejects_unknown_key() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["settings", "set", "favourite-cat", "tabby"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("favourite-cat"));
}

#[test]
fn test_settings_rejects_invalid_color() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["settings", "set", "color", "purple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("auto, always, never"));
}

#[test]
fn test_forget_missing_package_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["forget", "never-installed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("never-installed"));
}

#[test]
fn test_forget_hides_recorded_package() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("info.json"),
        r#"[{"pkgname":"vim","version":"9.1","source":"pac"}]"#,
    )
    .unwrap();

    meow(temp_dir.path())
        .args(["forget", "vim"])
        .assert()
        .success();

    let records = std::fs::read_to_string(temp_dir.path().join("info.json")).unwrap();
    assert!(records.contains("\"deleted\": true") || records.contains("\"deleted\":true"));
}

#[test]
fn test_fetch_reports_system() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .arg("fetch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Host"));
}

#[test]
fn test_completions_bash() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meow"));
}

#[test]
fn test_admin_without_key_fails_locally() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .args(["admin", "verify", "meowtool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Admin API key required"));
}

#[test]
fn test_health_reports_unreachable_registry() {
    let temp_dir = tempfile::tempdir().unwrap();

    meow(temp_dir.path())
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("127.0.0.1:9"));
}
