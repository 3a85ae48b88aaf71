use crate::core::types::{Action, Source};
use crate::error::{MeowError, Result};
use crate::packages::command_exec::{self, run_query};
use crate::packages::search_parsing::parse_indented_listing;
use crate::packages::traits::{Backend, ExecStatus, InstallTarget, PackageSearchResult, SearchQuery};
use crate::utils::platform;
use std::time::Duration;

const PACMAN: &str = "pacman";

pub struct PacmanBackend {
    query_timeout: Duration,
}

impl PacmanBackend {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }
}

impl Backend for PacmanBackend {
    fn source(&self) -> Source {
        Source::Pacman
    }

    fn is_available(&self) -> bool {
        platform::program_available(PACMAN)
    }

    fn exists(&self, name: &str) -> bool {
        query_has_output(PACMAN, "-Ss", name, self.query_timeout)
    }

    fn resolve_target(&self, _action: Action, name: &str) -> Result<Option<InstallTarget>> {
        Ok(Some(InstallTarget::named(name)))
    }

    /// `sudo pacman -S <name>` for both install and update.
    fn execute(&self, _action: Action, target: &InstallTarget) -> Result<ExecStatus> {
        command_exec::run_mutating(PACMAN, &["-S".to_string(), target.id.clone()], true, None)
    }

    fn resolve_version(&self, target: &InstallTarget) -> String {
        query_version(PACMAN, &target.id, self.query_timeout)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>> {
        listing_search(PACMAN, query, Source::Pacman, self.query_timeout)
    }
}

/// `<program> <flag> <name>` exited 0 with non-blank stdout.
pub(super) fn query_has_output(program: &str, flag: &str, name: &str, timeout: Duration) -> bool {
    if crate::utils::sanitize::validate_package_name(name).is_err() {
        return false;
    }

    match run_query(program, &[flag.to_string(), name.to_string()], timeout) {
        Ok(output) => {
            output.status.success() && !String::from_utf8_lossy(&output.stdout).trim().is_empty()
        }
        Err(_) => false,
    }
}

/// `<program> -Qi <name>` through the version extractor.
pub(super) fn query_version(program: &str, name: &str, timeout: Duration) -> String {
    command_exec::version_from_query(run_query(
        program,
        &["-Qi".to_string(), name.to_string()],
        timeout,
    ))
}

/// `-Ss` search. A nonzero exit with no output means no matches.
pub(super) fn listing_search(
    program: &str,
    query: &SearchQuery,
    source: Source,
    timeout: Duration,
) -> Result<Vec<PackageSearchResult>> {
    let output = run_query(program, &["-Ss".to_string(), query.text.clone()], timeout)?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stdout.trim().is_empty() && stderr.trim().is_empty() {
            return Ok(Vec::new());
        }
        return Err(MeowError::BackendFailure {
            backend: source.display_name().to_string(),
            diagnostic: command_exec::exit_diagnostic(
                &format!("{} -Ss {}", program, query.text),
                output.status.code(),
                &stderr,
            ),
        });
    }

    let mut results = parse_indented_listing(&stdout, source);
    results.truncate(query.limit);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UNKNOWN_VERSION;

    #[cfg(unix)]
    #[test]
    fn failed_version_query_records_unknown() {
        assert_eq!(query_version("false", "foo", Duration::from_secs(5)), UNKNOWN_VERSION);
    }
}
