//! Core traits for dependency injection and testability
//!
//! Operator interaction, the install record store and backend construction
//! are all reached through these traits, so the orchestration logic can be
//! exercised without a terminal, a real state file, or real package tools.

use crate::config::settings::Settings;
use crate::core::types::Source;
use crate::error::Result;
use crate::packages::traits::Backend;
use crate::state::types::{InstallRecord, RecordPatch};

/// Yes/no confirmation from the operator.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Ask the operator which source should provide a package.
///
/// Returns the raw answer; `None` if no answer could be read.
pub trait SourcePrompt: Send + Sync {
    fn choose_source(&self, package: &str) -> Option<String>;
}

/// Key-value repository of install records, keyed by lower-cased name.
pub trait RecordStore: Send + Sync {
    /// Look up a record. Unreadable or corrupted storage yields `None`.
    fn get(&self, name: &str) -> Option<InstallRecord>;

    /// Insert or replace the record for `record.name`.
    fn upsert(&self, record: InstallRecord) -> Result<()>;

    /// Merge the set fields of `patch` into an existing record.
    /// Returns `false` when no record matches `name`.
    fn merge(&self, name: &str, patch: RecordPatch) -> Result<bool>;

    fn all(&self) -> Vec<InstallRecord>;
}

/// Construct backend adapters on demand.
pub trait BackendProvider: Send + Sync {
    fn backend(&self, source: Source) -> Result<Box<dyn Backend>>;
}

/// Application context holding all dependencies
pub struct AppContext {
    pub store: Box<dyn RecordStore>,
    pub confirm: Box<dyn Confirm>,
    pub prompt: Box<dyn SourcePrompt>,
    pub backends: Box<dyn BackendProvider>,
}

impl AppContext {
    /// Create a new context with the given dependencies
    pub fn new(
        store: Box<dyn RecordStore>,
        confirm: Box<dyn Confirm>,
        prompt: Box<dyn SourcePrompt>,
        backends: Box<dyn BackendProvider>,
    ) -> Self {
        Self {
            store,
            confirm,
            prompt,
            backends,
        }
    }

    /// Context wired to the terminal, the on-disk store and real backends.
    pub fn from_settings(settings: &Settings, assume_yes: bool) -> Result<Self> {
        Ok(Self {
            store: Box::new(crate::state::io::FilesystemRecordStore::new(
                crate::utils::paths::state_file()?,
            )),
            confirm: Box::new(crate::ui::StdinConfirm { assume_yes }),
            prompt: Box::new(crate::ui::StdinSourcePrompt),
            backends: Box::new(crate::packages::registry::SettingsBackends::new(
                settings.clone(),
            )),
        })
    }
}
