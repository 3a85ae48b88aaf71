//! Filesystem-backed install record store.
//!
//! The whole store is one JSON document. Reads are tolerant: a missing or
//! empty file is an empty store, and a corrupted file is reported once and
//! treated as empty so callers keep working. Writes always emit a
//! well-formed array through a temp file and rename.
//!
//! There is no locking; concurrent writers race.

use crate::error::{MeowError, Result};
use crate::state::types::{InstallRecord, RecordDocument, RecordPatch};
use crate::traits::RecordStore;
use crate::ui;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct FilesystemRecordStore {
    path: PathBuf,
}

impl FilesystemRecordStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_or_degrade(&self) -> Vec<InstallRecord> {
        match load_records(&self.path) {
            Ok(records) => records,
            Err(e) => {
                ui::warning(&format!("{} (continuing without install records)", e));
                Vec::new()
            }
        }
    }
}

/// Read every record from `path`.
///
/// Missing or blank files yield an empty list; undecodable content is
/// `StoreCorrupt`.
pub fn load_records(path: &Path) -> Result<Vec<InstallRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|e| MeowError::StoreCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str::<RecordDocument>(&content)
        .map(RecordDocument::into_records)
        .map_err(|e| MeowError::StoreCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Locate the record for `name`: exact name first, then exact external id.
/// Partial matches never count, so a new name always gets its own record.
pub(crate) fn find_index(records: &[InstallRecord], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let external = |r: &InstallRecord| r.external_id.as_deref().map(str::to_lowercase);

    records
        .iter()
        .rposition(|r| r.key() == wanted)
        .or_else(|| {
            records
                .iter()
                .rposition(|r| external(r).is_some_and(|id| id == wanted))
        })
}

/// Keep only the last record per lower-cased name.
pub(crate) fn dedupe(records: Vec<InstallRecord>) -> Vec<InstallRecord> {
    let mut out: Vec<InstallRecord> = Vec::with_capacity(records.len());
    for record in records {
        if let Some(pos) = out.iter().position(|r| r.key() == record.key()) {
            out.remove(pos);
        }
        out.push(record);
    }
    out
}

pub fn save_records(path: &Path, records: Vec<InstallRecord>) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        MeowError::PathError(format!(
            "Invalid store path (no parent directory): {}",
            path.display()
        ))
    })?;

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| MeowError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let records = dedupe(records);
    let content = serde_json::to_string_pretty(&records)?;

    // Guard against writing something the loader would reject.
    let _: Vec<InstallRecord> = serde_json::from_str(&content)
        .map_err(|e| MeowError::Other(format!("Invalid JSON generated: {}", e)))?;

    if path.exists() {
        let backup = backup_path(path);
        if let Err(e) = fs::copy(path, &backup) {
            ui::warning(&format!(
                "Failed to back up {} to {}: {}",
                path.display(),
                backup.display(),
                e
            ));
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| MeowError::IoError {
        path: tmp_path.clone(),
        source: e,
    })?;
    tmp_file.write_all(content.as_bytes())?;
    tmp_file.write_all(b"\n")?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| MeowError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

impl RecordStore for FilesystemRecordStore {
    fn get(&self, name: &str) -> Option<InstallRecord> {
        let records = self.load_or_degrade();
        let found = find_index(&records, name).map(|i| records[i].clone());
        match &found {
            Some(record) => ui::verbose(&format!(
                "Matched {} → source={}",
                record.name, record.source
            )),
            None => ui::verbose(&format!("Package '{}' not found in install records", name)),
        }
        found
    }

    fn upsert(&self, record: InstallRecord) -> Result<()> {
        let mut records = self.load_or_degrade();
        let key = record.key();
        records.retain(|r| r.key() != key);
        records.push(record);
        save_records(&self.path, records)
    }

    fn merge(&self, name: &str, patch: RecordPatch) -> Result<bool> {
        let mut records = self.load_or_degrade();
        let Some(index) = find_index(&records, name) else {
            return Ok(false);
        };
        records[index].apply(patch);
        save_records(&self.path, records)?;
        Ok(true)
    }

    fn all(&self) -> Vec<InstallRecord> {
        self.load_or_degrade()
    }
}
