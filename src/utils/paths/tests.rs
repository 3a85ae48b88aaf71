use super::*;

#[test]
fn expand_home_leaves_plain_paths_alone() {
    let path = Path::new("/var/lib/meow");
    assert_eq!(expand_home(path).expect("plain path"), PathBuf::from("/var/lib/meow"));
}

#[test]
fn expand_home_resolves_tilde_prefix() {
    let expanded = expand_home(Path::new("~/pkgs")).expect("home path");
    assert!(expanded.ends_with("pkgs"));
    assert!(!expanded.to_string_lossy().starts_with('~'));
}

#[test]
fn expand_home_rejects_other_user_syntax() {
    assert!(expand_home(Path::new("~bob/pkgs")).is_err());
}

#[test]
fn settings_and_log_file_names() {
    assert!(settings_file().expect("settings").ends_with("settings.kdl"));
    assert!(action_log_file().expect("log").ends_with("meow.log"));
}
