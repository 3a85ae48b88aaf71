use crate::core::types::{Action, Outcome, Source};
use crate::error::{MeowError, Result};
use crate::traits::Confirm;
use crate::ui as output;
use crate::utils::sanitize;
use std::path::PathBuf;

/// Search result from a package source
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSearchResult {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub backend: Source,
    /// Repository, verification badge or display name, depending on source.
    pub annotation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub limit: usize,
    pub verified_only: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: crate::api::client::DEFAULT_RESULT_LIMIT,
            verified_only: false,
        }
    }
}

/// What a backend will actually act on for a requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// Name as requested by the operator.
    pub name: String,
    /// Identifier handed to the tool (package name, app id, checkout name).
    pub id: String,
    /// Where the bits come from, when that differs per package (git URL).
    pub origin: Option<String>,
    /// Persisted with the install record.
    pub external_id: Option<String>,
    pub version_hint: Option<String>,
}

impl InstallTarget {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: name.to_string(),
            origin: None,
            external_id: None,
            version_hint: None,
        }
    }

    /// Text shown in the confirmation prompt.
    pub fn describe(&self) -> String {
        match &self.origin {
            Some(origin) => format!("{} from {}", self.name, origin),
            None if self.id != self.name => self.id.clone(),
            None => self.name.clone(),
        }
    }
}

/// Exit of a mutating command. `diagnostic` is empty on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecStatus {
    pub success: bool,
    pub diagnostic: String,
}

impl ExecStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            diagnostic: String::new(),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            success: false,
            diagnostic: diagnostic.into(),
        }
    }
}

pub trait Backend: Send + Sync {
    fn source(&self) -> Source;

    /// The backing tool is installed (pacman, the AUR helper, flatpak, git).
    fn is_available(&self) -> bool;

    /// Read-only existence check. Any failure reads as `false`.
    fn exists(&self, name: &str) -> bool;

    /// Map a requested name to something installable. `Ok(None)` is not found.
    fn resolve_target(&self, action: Action, name: &str) -> Result<Option<InstallTarget>>;

    /// Run the mutating command for an already confirmed target.
    fn execute(&self, action: Action, target: &InstallTarget) -> Result<ExecStatus>;

    /// Version after a successful action, via the version extractor where the
    /// tool prints `Version : x`.
    fn resolve_version(&self, target: &InstallTarget) -> String;

    fn search(&self, query: &SearchQuery) -> Result<Vec<PackageSearchResult>>;

    /// Local tree produced by an install, for sources that have one.
    fn checkout_dir(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    fn install(&self, name: &str, confirm: &dyn Confirm) -> Result<Outcome> {
        run_transaction(self, Action::Install, name, confirm)
    }

    fn update(&self, name: &str, confirm: &dyn Confirm) -> Result<Outcome> {
        run_transaction(self, Action::Update, name, confirm)
    }
}

/// resolve target -> confirm -> execute -> resolve version.
///
/// Errors are reserved for invalid input and unreachable services; everything
/// the operator or the tool decides is an `Outcome`.
pub fn run_transaction<B: Backend + ?Sized>(
    backend: &B,
    action: Action,
    name: &str,
    confirm: &dyn Confirm,
) -> Result<Outcome> {
    sanitize::validate_package_name(name)?;

    let Some(target) = backend.resolve_target(action, name)? else {
        output::verbose(&format!(
            "{} could not resolve '{}'",
            backend.source().display_name(),
            name
        ));
        return Ok(Outcome::NotFound);
    };

    let question = format!("Are you sure you want to {} {}?", action, target.describe());
    if !confirm.confirm(&question) {
        return Ok(Outcome::Cancelled);
    }

    let status = match backend.execute(action, &target) {
        Ok(status) => status,
        Err(MeowError::Cancelled) => return Ok(Outcome::Cancelled),
        Err(e) => ExecStatus::failed(e.to_string()),
    };

    if !status.success {
        return Ok(Outcome::Failed {
            diagnostic: status.diagnostic,
        });
    }

    Ok(Outcome::Success {
        version: backend.resolve_version(&target),
        external_id: target.external_id.clone(),
    })
}
