//! Command dispatcher
//!
//! Routes CLI commands to their appropriate handlers.

mod normalization;

pub use normalization::normalize_legacy_flags;

use crate::api::client::MeowApiClient;
use crate::api::types::PackageUpdate;
use crate::cli::args::{AdminSubcommand, Cli, Command, SettingsSubcommand};
use crate::commands;
use crate::commands::registry::{AdminCommand, PublishOptions};
use crate::commands::settings::SettingsCommand;
use crate::config::settings::Settings;
use crate::core::types::Action;
use crate::error::Result;
use crate::packages::registry::SettingsBackends;
use crate::packages::traits::SearchQuery;
use crate::state::io::FilesystemRecordStore;
use crate::traits::AppContext;
use crate::ui as output;
use crate::utils::paths;
use clap::CommandFactory;

/// Dispatch the parsed CLI command to the appropriate handler
pub fn dispatch(args: &Cli) -> Result<()> {
    // These work even when the settings file is broken.
    match &args.command {
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
        Some(Command::Settings { command }) => {
            return commands::settings::run(map_settings_command(command));
        }
        Some(Command::Completions { shell }) => return commands::completions::run(*shell),
        Some(_) => {}
    }

    let settings = Settings::load()?;
    output::init_colors(args.global.color.as_deref().unwrap_or(&settings.color()));

    match &args.command {
        Some(Command::Install { package, source }) => {
            let ctx = AppContext::from_settings(&settings, args.global.yes)?;
            commands::install::run(&ctx, &settings, Action::Install, package, source.as_deref())
        }

        Some(Command::Update { package, source }) => {
            let ctx = AppContext::from_settings(&settings, args.global.yes)?;
            commands::install::run(&ctx, &settings, Action::Update, package, source.as_deref())
        }

        Some(Command::Search {
            query,
            limit,
            verified,
        }) => commands::search::run(
            &SettingsBackends::new(settings.clone()),
            SearchQuery {
                text: query.clone(),
                limit: *limit,
                verified_only: *verified,
            },
        ),

        Some(Command::Check { package, details }) => commands::check::run(
            &SettingsBackends::new(settings.clone()),
            &settings,
            package,
            *details,
        ),

        Some(Command::Fetch) => commands::fetch::run(),

        Some(Command::Info { package }) => {
            commands::registry::info(&MeowApiClient::from_settings(&settings)?, package)
        }

        Some(Command::List { limit, verified }) => {
            commands::registry::list(&MeowApiClient::from_settings(&settings)?, *limit, *verified)
        }

        Some(Command::Publish {
            name,
            pkg_version,
            giturl,
            owner,
            description,
            license,
            tags,
        }) => commands::registry::publish(
            &MeowApiClient::from_settings(&settings)?,
            PublishOptions {
                name: name.clone(),
                version: pkg_version.clone(),
                giturl: giturl.clone(),
                owner: owner.clone(),
                description: description.clone(),
                license: license.clone(),
                tags: tags.clone(),
            },
        ),

        Some(Command::Health) => {
            commands::registry::health(&MeowApiClient::from_settings(&settings)?)
        }

        Some(Command::Admin { command }) => commands::registry::admin(
            &MeowApiClient::from_settings(&settings)?,
            map_admin_command(command),
            &output::StdinConfirm {
                assume_yes: args.global.yes,
            },
        ),

        Some(Command::Build { dir }) => commands::build::run(dir.clone(), &settings),

        Some(Command::Forget { package }) => commands::forget::run(
            &FilesystemRecordStore::new(paths::state_file()?),
            package,
        ),

        Some(Command::Settings { .. }) | Some(Command::Completions { .. }) | None => Ok(()),
    }
}

fn map_settings_command(command: &SettingsSubcommand) -> SettingsCommand {
    match command {
        SettingsSubcommand::Show => SettingsCommand::Show,
        SettingsSubcommand::Get { key } => SettingsCommand::Get { key: key.clone() },
        SettingsSubcommand::Set { key, value } => SettingsCommand::Set {
            key: key.clone(),
            value: value.clone(),
        },
        SettingsSubcommand::Reset { key } => SettingsCommand::Reset { key: key.clone() },
    }
}

fn map_admin_command(command: &AdminSubcommand) -> AdminCommand {
    match command {
        AdminSubcommand::Verify { name } => AdminCommand::Verify { name: name.clone() },
        AdminSubcommand::Unverify { name } => AdminCommand::Unverify { name: name.clone() },
        AdminSubcommand::Delete { name, hard } => AdminCommand::Delete {
            name: name.clone(),
            hard: *hard,
        },
        AdminSubcommand::Update {
            name,
            owner,
            pkg_version,
            giturl,
            description,
        } => AdminCommand::Update {
            name: name.clone(),
            update: PackageUpdate {
                owner: owner.clone(),
                version: pkg_version.clone(),
                giturl: giturl.clone(),
                description: description.clone(),
            },
        },
        AdminSubcommand::Info => AdminCommand::Info,
    }
}

#[cfg(test)]
mod tests;
