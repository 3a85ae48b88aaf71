use super::*;
use crate::project_identity;
use clap::CommandFactory;

fn parse(args: &[&str]) -> Cli {
    let mut full = vec![project_identity::BINARY_NAME];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).expect("arguments should parse")
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn install_accepts_short_long_and_alias_source_flags() {
    for flags in [
        vec!["install", "vim", "-s", "pac"],
        vec!["install", "vim", "--source", "pac"],
        vec!["install", "vim", "--src", "pac"],
        vec!["install", "vim", "--source=pac"],
    ] {
        match parse(&flags).command {
            Some(Command::Install { package, source }) => {
                assert_eq!(package, "vim");
                assert_eq!(source.as_deref(), Some("pac"));
            }
            other => panic!("unexpected parse for {flags:?}: {other:?}"),
        }
    }
}

#[test]
fn update_source_is_optional() {
    match parse(&["update", "gimp"]).command {
        Some(Command::Update { package, source }) => {
            assert_eq!(package, "gimp");
            assert!(source.is_none());
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn global_flags_work_after_the_subcommand() {
    let cli = parse(&["install", "vim", "-y", "-v", "--color", "never"]);
    assert!(cli.global.yes);
    assert!(cli.global.verbose);
    assert_eq!(cli.global.color.as_deref(), Some("never"));
}

#[test]
fn invalid_color_is_rejected() {
    assert!(Cli::try_parse_from([project_identity::BINARY_NAME, "--color", "rainbow", "fetch"]).is_err());
}

#[test]
fn search_defaults() {
    match parse(&["search", "cat"]).command {
        Some(Command::Search { query, limit, verified }) => {
            assert_eq!(query, "cat");
            assert_eq!(limit, 50);
            assert!(!verified);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn publish_splits_tags() {
    match parse(&[
        "publish",
        "meowtool",
        "1.0",
        "https://x/meowtool.git",
        "--owner",
        "tabby",
        "--tags",
        "cli,cats",
    ])
    .command
    {
        Some(Command::Publish { pkg_version, tags, .. }) => {
            assert_eq!(pkg_version, "1.0");
            assert_eq!(tags, ["cli", "cats"]);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn admin_delete_hard_flag() {
    match parse(&["admin", "delete", "meowtool", "--hard"]).command {
        Some(Command::Admin {
            command: AdminSubcommand::Delete { name, hard },
        }) => {
            assert_eq!(name, "meowtool");
            assert!(hard);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn completions_take_a_shell() {
    assert!(matches!(
        parse(&["completions", "bash"]).command,
        Some(Command::Completions { shell: Shell::Bash })
    ));
}
