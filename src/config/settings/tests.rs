use super::*;
use tempfile::tempdir;

#[test]
fn defaults_apply_without_a_file() {
    let dir = tempdir().expect("tempdir");
    let settings = Settings::load_from(&dir.path().join("settings.kdl")).expect("load");
    assert_eq!(settings.aur_helper(), "yay");
    assert_eq!(settings.http_timeout(), Duration::from_secs(10));
    assert_eq!(settings.query_timeout(), Duration::from_secs(30));
    assert_eq!(settings.flathub_repo(), DEFAULT_FLATHUB_REPO);
    assert_eq!(settings.color(), "auto");
}

#[test]
fn parses_settings_block_with_strings_and_numbers() {
    let parsed = parse_settings(
        "settings {\n    aur-helper \"paru\"\n    http-timeout 5\n}\n",
    )
    .expect("valid kdl");
    assert_eq!(parsed.get("aur-helper").map(String::as_str), Some("paru"));
    assert_eq!(parsed.get("http-timeout").map(String::as_str), Some("5"));
}

#[test]
fn invalid_kdl_is_a_config_error() {
    let err = parse_settings("settings {").expect_err("unbalanced braces");
    assert!(matches!(err, MeowError::ConfigError(_)));
}

#[test]
fn set_persists_and_reloads() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("settings.kdl");
    let mut settings = Settings::load_from(&path).expect("load");
    settings
        .set("aur-helper".to_string(), "paru".to_string())
        .expect("set");
    settings
        .set("query-timeout".to_string(), "7".to_string())
        .expect("set");

    let reloaded = Settings::load_from(&path).expect("reload");
    assert_eq!(reloaded.aur_helper(), "paru");
    assert_eq!(reloaded.query_timeout(), Duration::from_secs(7));
}

#[test]
fn reset_restores_default() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.kdl");
    let mut settings = Settings::load_from(&path).expect("load");
    settings.set("color".to_string(), "never".to_string()).expect("set");
    settings.reset("color").expect("reset");
    assert_eq!(settings.color(), "auto");
}

#[test]
fn rejects_unknown_keys_and_bad_values() {
    assert!(validate_key("registry-url").is_ok());
    assert!(validate_key("colour").is_err());
    assert!(validate_value("color", "sometimes").is_err());
    assert!(validate_value("http-timeout", "0").is_err());
    assert!(validate_value("http-timeout", "ten").is_err());
    assert!(validate_value("registry-url", "ftp://x").is_err());
    assert!(validate_value("aur-helper", "yay --x").is_err());
    assert!(validate_value("aur-helper", "paru").is_ok());
}

#[test]
fn zero_or_garbage_timeouts_fall_back() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.kdl");
    fs::write(&path, "settings {\n  http-timeout \"abc\"\n  query-timeout 0\n}\n").expect("write");
    let settings = Settings::load_from(&path).expect("load");
    assert_eq!(settings.http_timeout(), Duration::from_secs(10));
    assert_eq!(settings.query_timeout(), Duration::from_secs(30));
}
