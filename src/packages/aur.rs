use crate::core::types::{Action, Source};
use crate::error::Result;
use crate::packages::command_exec;
use crate::packages::pacman::{listing_search, query_has_output, query_version};
use crate::packages::traits::{Backend, ExecStatus, InstallTarget, PackageSearchResult, SearchQuery};
use crate::utils::platform;
use std::time::Duration;

/// AUR access through a pacman-compatible helper (yay, paru, ...).
pub struct AurBackend {
    helper: String,
    query_timeout: Duration,
}

impl AurBackend {
    pub fn new(helper: &str, query_timeout: Duration) -> Self {
        Self {
            helper: helper.to_string(),
            query_timeout,
        }
    }

    pub fn helper(&self) -> &str {
        &self.helper
    }

    /// Helpers elevate on their own, so they always run as the invoking user.
    pub fn mutating_args(&self, action: Action, name: &str) -> Vec<String> {
        let mut args = vec!["-S".to_string()];
        if action == Action::Update {
            args.push("--needed".to_string());
        }
        if self.helper_is("yay") {
            args.push("--nocleanmenu".to_string());
            args.push("--nodiffmenu".to_string());
        }
        args.push(name.to_string());
        args
    }

    fn helper_is(&self, name: &str) -> bool {
        std::path::Path::new(&self.helper)
            .file_name()
            .is_some_and(|f| f == std::ffi::OsStr::new(name))
    }
}

impl Backend for AurBackend {
    fn source(&self) -> Source {
        Source::Aur
    }

    fn is_available(&self) -> bool {
        platform::program_available(&self.helper)
    }

    fn exists(&self, name: &str) -> bool {
        query_has_output(&self.helper, "-Ss", name, self.query_timeout)
    }

    fn resolve_target(&self, _action: Action, name: &str) -> Result<Option<InstallTarget>> {
        Ok(Some(InstallTarget::named(name)))
    }

    fn execute(&self, action: Action, target: &InstallTarget) -> Result<ExecStatus> {
        command_exec::run_mutating(
            &self.helper,
            &self.mutating_args(action, &target.id),
            false,
            None,
        )
    }

    fn resolve_version(&self, target: &InstallTarget) -> String {
        query_version(&self.helper, &target.id, self.query_timeout)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>> {
        listing_search(&self.helper, query, Source::Aur, self.query_timeout)
    }
}
