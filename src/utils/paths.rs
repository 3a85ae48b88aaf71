use crate::error::{MeowError, Result};
use crate::project_identity;
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new()
        .ok_or_else(|| MeowError::PathError("Could not determine user home directory".to_string()))?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| MeowError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(
        project_identity::PROJECT_QUALIFIER,
        project_identity::PROJECT_ORG,
        project_identity::STABLE_PROJECT_ID,
    )
    .ok_or_else(|| MeowError::PathError("Could not determine project directories".to_string()))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(project_identity::SETTINGS_FILE_NAME))
}

/// State lives under the XDG state dir, falling back to the data dir on
/// platforms without one. `MEOW_STATE_FILE` overrides the full path.
pub fn state_file() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var(project_identity::env_key("STATE_FILE"))
        && !custom.trim().is_empty()
    {
        return expand_home(Path::new(custom.trim()));
    }

    let dirs = project_dirs()?;
    let base = dirs
        .state_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.data_local_dir().to_path_buf());
    Ok(base.join(project_identity::STATE_FILE_NAME))
}

pub fn cache_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

pub fn action_log_file() -> Result<PathBuf> {
    Ok(cache_dir()?.join(project_identity::ACTION_LOG_FILE_NAME))
}

/// Default checkout root for registry packages.
pub fn packages_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("packages"))
}

#[cfg(test)]
mod tests;
