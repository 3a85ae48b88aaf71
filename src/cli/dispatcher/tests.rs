use super::*;
use crate::project_identity;
use clap::Parser;
use std::ffi::OsString;

fn normalized(args: &[&str]) -> Vec<String> {
    normalize_legacy_flags(args.iter().map(OsString::from))
        .into_iter()
        .map(|a| a.to_string_lossy().to_string())
        .collect()
}

#[test]
fn legacy_src_flag_becomes_source() {
    assert_eq!(
        normalized(&["meow", "install", "vim", "-src", "pac"]),
        ["meow", "install", "vim", "--source", "pac"]
    );
    assert_eq!(
        normalized(&["meow", "update", "gimp", "-src=fb"]),
        ["meow", "update", "gimp", "--source=fb"]
    );
}

#[test]
fn other_arguments_are_untouched() {
    assert_eq!(
        normalized(&["meow", "search", "-srcfoo", "--src", "-s"]),
        ["meow", "search", "-srcfoo", "--src", "-s"]
    );
}

#[test]
fn normalized_legacy_flag_parses_as_source() {
    let args = normalize_legacy_flags(
        [project_identity::BINARY_NAME, "install", "vim", "-src", "aur"]
            .iter()
            .map(OsString::from),
    );
    match Cli::try_parse_from(args).expect("parses").command {
        Some(Command::Install { source, .. }) => assert_eq!(source.as_deref(), Some("aur")),
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn admin_update_maps_all_fields() {
    let mapped = map_admin_command(&AdminSubcommand::Update {
        name: "meowtool".to_string(),
        owner: None,
        pkg_version: Some("2.0".to_string()),
        giturl: None,
        description: Some("cats".to_string()),
    });
    match mapped {
        AdminCommand::Update { name, update } => {
            assert_eq!(name, "meowtool");
            assert_eq!(update.version.as_deref(), Some("2.0"));
            assert_eq!(update.description.as_deref(), Some("cats"));
            assert!(update.owner.is_none());
        }
        other => panic!("unexpected mapping: {other:?}"),
    }
}
