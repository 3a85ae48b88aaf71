use crate::core::types::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One locally tracked package.
///
/// Field names on disk (`pkgname`, `ID`) match the historical `info.json`
/// layout so existing files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallRecord {
    #[serde(rename = "pkgname")]
    pub name: String,

    #[serde(default = "unknown_version")]
    pub version: String,

    pub source: Source,

    /// Backend-internal identifier (Flathub app id).
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Soft-delete marker
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn unknown_version() -> String {
    crate::core::types::UNKNOWN_VERSION.to_string()
}

impl InstallRecord {
    pub fn new(name: &str, version: &str, source: Source) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            source,
            external_id: None,
            deleted: false,
            updated_at: Some(Utc::now()),
        }
    }

    pub fn with_external_id(mut self, external_id: Option<String>) -> Self {
        self.external_id = external_id;
        self
    }

    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Apply the set fields of `patch`.
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(external_id) = patch.external_id {
            self.external_id = Some(external_id);
        }
        if let Some(deleted) = patch.deleted {
            self.deleted = deleted;
        }
        self.updated_at = Some(Utc::now());
    }
}

/// Field-by-field update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub version: Option<String>,
    pub source: Option<Source>,
    pub external_id: Option<String>,
    pub deleted: Option<bool>,
}

/// On-disk document: a single object or an array of objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordDocument {
    Many(Vec<InstallRecord>),
    One(InstallRecord),
}

impl RecordDocument {
    pub fn into_records(self) -> Vec<InstallRecord> {
        match self {
            RecordDocument::Many(records) => records,
            RecordDocument::One(record) => vec![record],
        }
    }
}
