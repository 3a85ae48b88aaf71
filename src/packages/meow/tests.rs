use super::*;
use std::time::Duration;
use tempfile::tempdir;

fn offline_backend(packages_dir: &Path) -> MeowBackend {
    let client = MeowApiClient::new("http://127.0.0.1:9", None, Duration::from_secs(1))
        .expect("client");
    MeowBackend::new(client, packages_dir.to_path_buf())
}

#[test]
fn checkout_name_from_urls() {
    assert_eq!(checkout_name("meowtool"), "meowtool");
    assert_eq!(checkout_name("https://github.com/cats/purr.git"), "purr");
    assert_eq!(checkout_name("https://github.com/cats/purr/"), "purr");
    assert_eq!(checkout_name("git@github.com:cats/purr.git"), "purr");
}

#[test]
fn url_targets_skip_the_registry() {
    let dir = tempdir().expect("tempdir");
    let backend = offline_backend(dir.path());
    let target = backend
        .resolve_target(Action::Install, "https://github.com/cats/purr.git")
        .expect("no registry call")
        .expect("target");
    assert_eq!(target.id, "purr");
    assert_eq!(target.origin.as_deref(), Some("https://github.com/cats/purr.git"));
    assert_eq!(
        backend.checkout_dir("https://github.com/cats/purr.git"),
        Some(dir.path().join("purr"))
    );
}

#[test]
fn install_with_unreachable_registry_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = offline_backend(dir.path())
        .resolve_target(Action::Install, "meowtool")
        .expect_err("transport");
    assert!(err.is_transport());
}

#[test]
fn update_of_existing_checkout_survives_registry_outage() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("meowtool").join(".git")).expect("fake checkout");
    let target = offline_backend(dir.path())
        .resolve_target(Action::Update, "meowtool")
        .expect("falls back")
        .expect("target");
    assert_eq!(target, InstallTarget::named("meowtool"));
}

#[test]
fn traversal_names_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let err = offline_backend(dir.path())
        .resolve_target(Action::Install, "../etc")
        .expect_err("invalid");
    assert!(matches!(err, MeowError::InvalidPackageName { .. }));
}

#[test]
fn missing_origin_fails_without_running_git() {
    let dir = tempdir().expect("tempdir");
    let status = offline_backend(dir.path())
        .execute(Action::Install, &InstallTarget::named("meowtool"))
        .expect("status");
    assert!(!status.success);
    assert!(status.diagnostic.contains("No git URL"));
}

#[test]
fn version_comes_from_registry_hint() {
    let dir = tempdir().expect("tempdir");
    let backend = offline_backend(dir.path());
    let hinted = InstallTarget {
        version_hint: Some("0.4.2".to_string()),
        ..InstallTarget::named("meowtool")
    };
    assert_eq!(backend.resolve_version(&hinted), "0.4.2");
    assert_eq!(backend.resolve_version(&InstallTarget::named("x")), "unknown");
}
