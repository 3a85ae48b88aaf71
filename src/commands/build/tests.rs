use super::*;
use std::cell::RefCell;
use tempfile::tempdir;

/// Records calls; items named `broken*` fail.
#[derive(Default)]
struct RecordingInstaller {
    calls: RefCell<Vec<(Section, String)>>,
}

impl RequirementInstaller for RecordingInstaller {
    fn install(&self, section: Section, item: &str) -> Result<ExecStatus> {
        self.calls.borrow_mut().push((section, item.to_string()));
        if item.starts_with("broken") {
            Ok(ExecStatus::failed("exit status 1"))
        } else {
            Ok(ExecStatus::ok())
        }
    }
}

#[test]
fn kdl_requirements_accept_arguments_and_children() {
    let parsed = parse_kdl(
        r#"
installfrompacman "git" "base-devel"
installfrompip {
    requests
    "rich>=13"
}
"#,
    )
    .expect("valid kdl");
    assert_eq!(parsed["installfrompacman"], ["git", "base-devel"]);
    assert_eq!(parsed["installfrompip"], ["requests", "rich>=13"]);
}

#[test]
fn txt_requirements_sections_and_comments() {
    let parsed = parse_txt(
        "# deps\n[installfrompacman]\ngit\n\n[installfromaur]\nyay-bin\n# skip\nparu-bin\nstray\n",
    );
    assert_eq!(parsed["installfrompacman"], ["git"]);
    assert_eq!(parsed["installfromaur"], ["yay-bin", "paru-bin", "stray"]);
}

#[test]
fn lines_before_any_section_are_ignored() {
    let parsed = parse_txt("orphan\n[installfrompip]\nrequests\n");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed["installfrompip"], ["requests"]);
}

#[test]
fn first_requirements_file_wins() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("requirements.txt"), "[installfrompip]\nrequests\n").expect("txt");
    assert_eq!(
        find_requirements(dir.path()),
        Some(dir.path().join("requirements.txt"))
    );

    fs::write(dir.path().join("requirements.json"), r#"{"installfrompip":["rich"]}"#).expect("json");
    let path = find_requirements(dir.path()).expect("found");
    assert!(path.ends_with("requirements.json"));
    assert_eq!(load_requirements(&path).expect("json")["installfrompip"], ["rich"]);
}

#[test]
fn failures_and_unknown_sections_do_not_stop_the_build() {
    let mut requirements = Requirements::new();
    requirements.insert(
        "installfrompacman".to_string(),
        vec!["git".to_string(), "broken-pkg".to_string(), "vim".to_string()],
    );
    requirements.insert("installfromnpm".to_string(), vec!["left-pad".to_string()]);

    let installer = RecordingInstaller::default();
    let summary = install_requirements(&requirements, &installer);

    assert_eq!(summary.installed, ["git", "vim"]);
    assert_eq!(summary.failed, [("broken-pkg".to_string(), "pacman".to_string())]);
    assert_eq!(summary.unknown_sections, ["installfromnpm"]);
    assert_eq!(installer.calls.borrow().len(), 3);
}

#[test]
fn missing_requirements_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let err = build_dir(dir.path(), &RecordingInstaller::default()).expect_err("nothing there");
    assert!(matches!(err, MeowError::NotFound(_)));
}

#[test]
fn malformed_json_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("requirements.json");
    fs::write(&path, "{not json").expect("write");
    assert!(load_requirements(&path).is_err());
}

#[test]
fn system_commands_match_each_section() {
    let installer = SystemInstaller::new("paru", Path::new("/tmp"));
    assert_eq!(
        installer.command_for(Section::Pacman, "git"),
        ("pacman".to_string(), vec!["-S".to_string(), "--noconfirm".to_string(), "git".to_string()], true)
    );
    assert_eq!(installer.command_for(Section::Aur, "yay-bin").0, "paru");
    assert_eq!(
        installer.command_for(Section::Git, "https://x/y.git").1,
        ["clone", "https://x/y.git"]
    );
    assert!(validate_item(Section::Pip, "--index-url=evil").is_err());
    assert!(validate_item(Section::Pip, "rich>=13").is_ok());
}

#[test]
fn failure_banner_names_repository_for_git_urls() {
    assert_eq!(display_item("https://github.com/cats/purr.git"), "purr");
    assert_eq!(display_item("vim"), "vim");
}
