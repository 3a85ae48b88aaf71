use crate::api::flathub::FlathubClient;
use crate::core::types::{Action, Source};
use crate::error::Result;
use crate::packages::command_exec::{self, run_query};
use crate::packages::traits::{Backend, ExecStatus, InstallTarget, PackageSearchResult, SearchQuery};
use crate::ui as output;
use crate::utils::platform;
use std::time::Duration;

const FLATPAK: &str = "flatpak";
const REMOTE_NAME: &str = "flathub";

pub struct FlatpakBackend {
    client: FlathubClient,
    repo_url: String,
    query_timeout: Duration,
}

impl FlatpakBackend {
    pub fn new(client: FlathubClient, repo_url: &str, query_timeout: Duration) -> Self {
        Self {
            client,
            repo_url: repo_url.to_string(),
            query_timeout,
        }
    }

    pub fn install_commands(&self, app_id: &str) -> [Vec<String>; 2] {
        [
            to_args(&["remote-add", "--user", "--if-not-exists", REMOTE_NAME, &self.repo_url]),
            to_args(&[
                "install",
                "--user",
                REMOTE_NAME,
                "--noninteractive",
                "--assumeyes",
                app_id,
            ]),
        ]
    }

    pub fn update_command(app_id: &str) -> Vec<String> {
        to_args(&["update", "--user", "--noninteractive", app_id])
    }
}

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl Backend for FlatpakBackend {
    fn source(&self) -> Source {
        Source::Flatpak
    }

    fn is_available(&self) -> bool {
        platform::program_available(FLATPAK)
    }

    fn exists(&self, name: &str) -> bool {
        match self.client.search(name) {
            Ok(hits) => hits.iter().any(|hit| hit.matches(name)),
            Err(e) => {
                output::verbose(&format!("Flathub lookup failed: {}", e));
                false
            }
        }
    }

    /// The first search hit's app id is the install target.
    fn resolve_target(&self, _action: Action, name: &str) -> Result<Option<InstallTarget>> {
        Ok(self.client.first_app_id(name)?.map(|app_id| InstallTarget {
            id: app_id.clone(),
            external_id: Some(app_id),
            ..InstallTarget::named(name)
        }))
    }

    fn execute(&self, action: Action, target: &InstallTarget) -> Result<ExecStatus> {
        match action {
            Action::Install => {
                for args in self.install_commands(&target.id) {
                    let status = command_exec::run_mutating(FLATPAK, &args, false, None)?;
                    if !status.success {
                        return Ok(status);
                    }
                }
                Ok(ExecStatus::ok())
            }
            Action::Update => command_exec::run_mutating(
                FLATPAK,
                &Self::update_command(&target.id),
                false,
                None,
            ),
        }
    }

    fn resolve_version(&self, target: &InstallTarget) -> String {
        command_exec::version_from_query(run_query(
            FLATPAK,
            &["info".to_string(), target.id.clone()],
            self.query_timeout,
        ))
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>> {
        Ok(self
            .client
            .search(&query.text)?
            .into_iter()
            .take(query.limit)
            .map(|hit| PackageSearchResult {
                name: hit.app_id,
                version: None,
                description: Some(hit.summary).filter(|s| !s.is_empty()),
                backend: Source::Flatpak,
                annotation: Some(hit.name).filter(|s| !s.is_empty()),
            })
            .collect())
    }
}
