//! Registry-backed packages: git checkouts under the packages directory.

use crate::api::client::MeowApiClient;
use crate::api::types::RegistryPackage;
use crate::core::types::{Action, Source, UNKNOWN_VERSION};
use crate::error::{MeowError, Result};
use crate::packages::command_exec;
use crate::packages::traits::{Backend, ExecStatus, InstallTarget, PackageSearchResult, SearchQuery};
use crate::ui as output;
use crate::utils::{platform, sanitize};
use std::fs;
use std::path::{Path, PathBuf};

const GIT: &str = "git";

pub struct MeowBackend {
    client: MeowApiClient,
    packages_dir: PathBuf,
}

impl MeowBackend {
    pub fn new(client: MeowApiClient, packages_dir: PathBuf) -> Self {
        Self {
            client,
            packages_dir,
        }
    }

    pub fn client(&self) -> &MeowApiClient {
        &self.client
    }

    /// Exact lookup first, then the `?name=` query. Only `NotFound` falls through.
    fn lookup(&self, name: &str) -> Result<Option<RegistryPackage>> {
        match self.client.find_package(name) {
            Ok(package) => Ok(Some(package)),
            Err(MeowError::NotFound(_)) => match self.client.lookup_by_query(name) {
                Ok(found) => Ok(found),
                Err(MeowError::NotFound(_)) => Ok(None),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    fn clone_into(&self, url: &str, dest: &Path) -> Result<ExecStatus> {
        fs::create_dir_all(&self.packages_dir).map_err(|e| MeowError::IoError {
            path: self.packages_dir.clone(),
            source: e,
        })?;
        command_exec::run_mutating(
            GIT,
            &[
                "clone".to_string(),
                url.to_string(),
                dest.to_string_lossy().to_string(),
            ],
            false,
            None,
        )
    }

    fn pull(&self, dest: &Path) -> Result<ExecStatus> {
        command_exec::run_mutating(GIT, &["pull".to_string()], false, Some(dest))
    }
}

/// Directory name for a package: the name itself, or the repository name
/// when installing straight from a URL.
pub fn checkout_name(name: &str) -> String {
    if !sanitize::is_url(name) {
        return name.to_string();
    }

    let trimmed = name.trim_end_matches('/');
    let last = trimmed
        .rsplit(&['/', ':'][..])
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

fn is_git_checkout(dir: &Path) -> bool {
    dir.join(".git").exists()
}

impl Backend for MeowBackend {
    fn source(&self) -> Source {
        Source::Registry
    }

    fn is_available(&self) -> bool {
        platform::program_available(GIT)
    }

    fn exists(&self, name: &str) -> bool {
        if sanitize::validate_package_name(name).is_err() {
            return false;
        }
        self.client.find_package(name).is_ok()
    }

    fn resolve_target(&self, action: Action, name: &str) -> Result<Option<InstallTarget>> {
        if sanitize::is_url(name) {
            let dir_name = checkout_name(name);
            sanitize::validate_checkout_name(&dir_name)?;
            return Ok(Some(InstallTarget {
                id: dir_name,
                origin: Some(name.to_string()),
                ..InstallTarget::named(name)
            }));
        }

        sanitize::validate_checkout_name(name)?;
        let has_checkout =
            action == Action::Update && is_git_checkout(&self.packages_dir.join(name));

        let package = match self.lookup(name) {
            Ok(package) => package,
            Err(e) if has_checkout => {
                output::warning(&format!("Registry unavailable, updating local checkout: {}", e));
                None
            }
            Err(e) => return Err(e),
        };

        let target = match package {
            Some(pkg) => match pkg.git_url() {
                Some(url) => Some(InstallTarget {
                    origin: Some(url.to_string()),
                    version_hint: pkg.version.clone(),
                    ..InstallTarget::named(name)
                }),
                None if has_checkout => Some(InstallTarget {
                    version_hint: pkg.version.clone(),
                    ..InstallTarget::named(name)
                }),
                None => {
                    output::warning(&format!("Package '{}' does not have a git URL", name));
                    None
                }
            },
            None if has_checkout => Some(InstallTarget::named(name)),
            None => None,
        };

        Ok(target)
    }

    fn execute(&self, action: Action, target: &InstallTarget) -> Result<ExecStatus> {
        let dest = self.packages_dir.join(&target.id);

        let status = match action {
            Action::Install if is_git_checkout(&dest) => {
                output::info(&format!(
                    "'{}' is already checked out at {}, pulling instead",
                    target.id,
                    dest.display()
                ));
                self.pull(&dest)?
            }
            Action::Update if is_git_checkout(&dest) => self.pull(&dest)?,
            _ => {
                let Some(url) = target.origin.as_deref() else {
                    return Ok(ExecStatus::failed(format!(
                        "No git URL known for '{}'",
                        target.name
                    )));
                };
                if dest.exists() {
                    output::warning(&format!(
                        "{} is not a git checkout, cloning again",
                        dest.display()
                    ));
                    fs::remove_dir_all(&dest).map_err(|e| MeowError::IoError {
                        path: dest.clone(),
                        source: e,
                    })?;
                }
                self.clone_into(url, &dest)?
            }
        };

        if status.success
            && action == Action::Install
            && !sanitize::is_url(&target.name)
            && let Err(e) = self.client.increment_download_count(&target.name)
        {
            output::verbose(&format!("Could not record download: {}", e));
        }

        Ok(status)
    }

    fn resolve_version(&self, target: &InstallTarget) -> String {
        target
            .version_hint
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>> {
        Ok(self
            .client
            .search_packages(&query.text, query.limit, query.verified_only)?
            .into_iter()
            .map(|pkg| PackageSearchResult {
                annotation: Some(
                    match (&pkg.owner, pkg.verified) {
                        (Some(owner), true) => format!("{} [verified]", owner),
                        (Some(owner), false) => format!("{} [unverified]", owner),
                        (None, true) => "[verified]".to_string(),
                        (None, false) => "[unverified]".to_string(),
                    },
                ),
                version: pkg.version,
                description: pkg.description.filter(|d| !d.is_empty()),
                backend: Source::Registry,
                name: pkg.name,
            })
            .collect())
    }

    fn checkout_dir(&self, name: &str) -> Option<PathBuf> {
        Some(self.packages_dir.join(checkout_name(name)))
    }
}

#[cfg(test)]
mod tests;
