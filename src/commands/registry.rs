//! Registry commands: info, list, publish, health and admin.

use crate::api::client::MeowApiClient;
use crate::api::types::{NewPackage, PackageUpdate, RegistryPackage};
use crate::error::{MeowError, Result};
use crate::traits::Confirm;
use crate::ui as output;
use crate::utils::{action_log, sanitize};
use colored::Colorize;

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub name: String,
    pub version: String,
    pub giturl: String,
    pub owner: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum AdminCommand {
    Verify { name: String },
    Unverify { name: String },
    Delete { name: String, hard: bool },
    Update { name: String, update: PackageUpdate },
    Info,
}

/// Label/value rows of a package card; empty optional fields are skipped.
pub fn package_card(pkg: &RegistryPackage) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Owner", pkg.owner.clone().unwrap_or_default()),
        ("Version", pkg.version_or_unknown().to_string()),
        ("Git URL", pkg.git_url().unwrap_or_default().to_string()),
    ];

    let optional = [
        ("Description", pkg.description.clone()),
        ("License", pkg.license.clone()),
        (
            "Dependencies",
            Some(pkg.dependencies.join(", ")).filter(|s| !s.is_empty()),
        ),
        ("Homepage", pkg.homepage.clone()),
        ("Repository", pkg.repository.clone()),
        ("Tags", Some(pkg.tags.join(", ")).filter(|s| !s.is_empty())),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.filter(|v| !v.is_empty()).map(|v| (label, v))),
    );

    rows.push(("Downloads", pkg.download_count.to_string()));
    rows
}

fn badge(verified: bool) -> String {
    if verified {
        "VERIFIED".green().bold().to_string()
    } else {
        "UNVERIFIED".yellow().to_string()
    }
}

pub fn info(client: &MeowApiClient, name: &str) -> Result<()> {
    let pkg = client.find_package(name)?;

    output::header(&format!("{} [{}]", pkg.name, badge(pkg.verified)));
    for (label, value) in package_card(&pkg) {
        output::keyval(label, &value);
    }
    Ok(())
}

pub fn list(client: &MeowApiClient, limit: usize, verified_only: bool) -> Result<()> {
    let packages = client.get_all_packages(0, limit, true, verified_only)?;
    if packages.is_empty() {
        output::info("No packages found.");
        return Ok(());
    }

    output::header("Registry packages");
    println!(
        "{:<30} {:<15} {:<20} {:<10} {:<10}",
        "Name".bold(),
        "Version".bold(),
        "Owner".bold(),
        "Verified".bold(),
        "Downloads".bold()
    );
    for pkg in &packages {
        println!(
            "{:<30} {:<15} {:<20} {:<10} {:<10}",
            pkg.name,
            pkg.version_or_unknown(),
            pkg.owner.as_deref().unwrap_or(""),
            if pkg.verified { "yes" } else { "no" },
            pkg.download_count
        );
    }
    output::separator();
    output::info(&format!("Total: {} packages", packages.len()));
    Ok(())
}

pub fn publish(client: &MeowApiClient, options: PublishOptions) -> Result<()> {
    sanitize::validate_checkout_name(&options.name)?;
    if !sanitize::is_url(&options.giturl) {
        return Err(MeowError::ConfigError(format!(
            "'{}' is not a git URL",
            options.giturl
        )));
    }

    let package = NewPackage {
        name: options.name,
        owner: options.owner,
        version: options.version,
        giturl: options.giturl,
        description: options.description.unwrap_or_default(),
        license: options.license,
        tags: options.tags,
    };

    let published = client.publish(&package)?;
    output::success(&format!(
        "Published {} {}",
        published.name,
        published.version_or_unknown()
    ));
    action_log::log_action(&format!("Published {} to the registry", published.name));
    Ok(())
}

pub fn health(client: &MeowApiClient) -> Result<()> {
    let status = client.health_check()?;
    output::keyval("Registry", client.base_url());
    output::keyval("Status", &status.status);
    Ok(())
}

pub fn admin(client: &MeowApiClient, command: AdminCommand, confirm: &dyn Confirm) -> Result<()> {
    match command {
        AdminCommand::Verify { name } => {
            client.verify_package(&name, true)?;
            output::success(&format!("Package '{}' has been verified.", name));
        }
        AdminCommand::Unverify { name } => {
            client.verify_package(&name, false)?;
            output::success(&format!("Package '{}' has been unverified.", name));
        }
        AdminCommand::Delete { name, hard } => {
            if !client.has_api_key() {
                return Err(MeowError::MissingApiKey);
            }
            let kind = if hard { "permanently delete" } else { "delete" };
            if !confirm.confirm(&format!("Are you sure you want to {} '{}'?", kind, name)) {
                return Err(MeowError::Cancelled);
            }
            client.delete_package(&name, hard)?;
            output::success(&format!("Package '{}' has been deleted.", name));
        }
        AdminCommand::Update { name, update } => {
            if update.is_empty() {
                return Err(MeowError::ConfigError(
                    "Nothing to update: pass at least one field".to_string(),
                ));
            }
            let updated = client.update_package_info(&name, &update)?;
            output::success(&format!("Updated {}", updated.name));
        }
        AdminCommand::Info => {
            let info = client.admin_info()?;
            output::header("Registry admin info");
            match info.as_object() {
                Some(map) => {
                    for (key, value) in map {
                        let text = value
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| value.to_string());
                        output::keyval(key, &text);
                    }
                }
                None => println!("{}", info),
            }
        }
    }
    Ok(())
}
