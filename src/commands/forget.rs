use crate::error::{MeowError, Result};
use crate::state::types::RecordPatch;
use crate::traits::RecordStore;
use crate::ui as output;
use crate::utils::action_log;

/// Soft-delete the install record for `name`. Nothing is uninstalled.
pub fn forget(store: &dyn RecordStore, name: &str) -> Result<()> {
    let patch = RecordPatch {
        deleted: Some(true),
        ..Default::default()
    };

    if !store.merge(name, patch)? {
        return Err(MeowError::NotFound(format!("{} has no install record", name)));
    }
    Ok(())
}

pub fn run(store: &dyn RecordStore, name: &str) -> Result<()> {
    forget(store, name)?;
    output::success(&format!("Forgot {}; the next install or update will ask for a source", name));
    action_log::log_action(&format!("Forgot {}", name));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::{Resolution, resolve};
    use crate::core::types::Source;
    use crate::state::io::FilesystemRecordStore;
    use crate::state::types::InstallRecord;
    use tempfile::tempdir;

    #[test]
    fn forgotten_records_stop_routing() {
        let dir = tempdir().expect("tempdir");
        let store = FilesystemRecordStore::new(dir.path().join("info.json"));
        store
            .upsert(InstallRecord::new("vim", "9.1", Source::Pacman))
            .expect("seed");

        forget(&store, "VIM").expect("forget");

        let record = store.get("vim").expect("kept on disk");
        assert!(record.deleted);
        assert_eq!(record.version, "9.1");
        assert_eq!(
            resolve("vim", None, &store).expect("resolve"),
            Resolution::RequiresPrompt
        );
    }

    #[test]
    fn unknown_package_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = FilesystemRecordStore::new(dir.path().join("info.json"));
        assert!(matches!(forget(&store, "ghost"), Err(MeowError::NotFound(_))));
        assert!(!dir.path().join("info.json").exists());
    }
}
