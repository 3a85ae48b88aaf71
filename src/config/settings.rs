//! Settings Module
//!
//! Manages meow configuration settings stored as KDL:
//!
//! ```kdl
//! settings {
//!     registry-url "http://localhost:8000"
//!     aur-helper "yay"
//!     http-timeout 10
//! }
//! ```
//!
//! `MEOW_API_URL`, `MEOW_ADMIN_API_KEY` override the file.

use crate::error::{MeowError, Result};
use crate::project_identity;
use crate::utils::paths;
use kdl::KdlDocument;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const VALID_KEYS: &[&str] = &[
    "registry-url",
    "aur-helper",
    "http-timeout",
    "query-timeout",
    "packages-dir",
    "flathub-repo",
    "api-key",
    "color",
];

pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8000";
pub const DEFAULT_FLATHUB_REPO: &str = "https://flathub.org/repo/flathub.flatpakrepo";

/// Settings manager
#[derive(Debug, Clone)]
pub struct Settings {
    settings_file: PathBuf,
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from the user config dir, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::settings_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut values = Self::defaults();
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| MeowError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
            values.extend(parse_settings(&content)?);
        }

        Ok(Self {
            settings_file: path.to_path_buf(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    /// Set a setting value and persist it
    pub fn set(&mut self, key: String, value: String) -> Result<()> {
        validate_key(&key)?;
        validate_value(&key, &value)?;
        self.values.insert(key, value);
        self.save()
    }

    /// Reset a setting to default
    pub fn reset(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        let default = Self::defaults().get(key).cloned().unwrap_or_default();
        self.values.insert(key.to_string(), default);
        self.save()
    }

    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn registry_url(&self) -> String {
        env_override("API_URL")
            .or_else(|| self.non_empty("registry-url"))
            .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string())
    }

    pub fn api_key(&self) -> Option<String> {
        env_override("ADMIN_API_KEY").or_else(|| self.non_empty("api-key"))
    }

    pub fn aur_helper(&self) -> String {
        self.non_empty("aur-helper")
            .unwrap_or_else(|| "yay".to_string())
    }

    pub fn http_timeout(&self) -> Duration {
        self.seconds("http-timeout", 10)
    }

    pub fn query_timeout(&self) -> Duration {
        self.seconds("query-timeout", 30)
    }

    pub fn flathub_repo(&self) -> String {
        self.non_empty("flathub-repo")
            .unwrap_or_else(|| DEFAULT_FLATHUB_REPO.to_string())
    }

    pub fn color(&self) -> String {
        self.non_empty("color").unwrap_or_else(|| "auto".to_string())
    }

    /// Where registry packages are cloned.
    pub fn packages_dir(&self) -> Result<PathBuf> {
        match self.non_empty("packages-dir") {
            Some(dir) => paths::expand_home(Path::new(&dir)),
            None => paths::packages_dir(),
        }
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn seconds(&self, key: &str, fallback: u64) -> Duration {
        let secs = self
            .non_empty(key)
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(fallback);
        Duration::from_secs(secs)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            fs::create_dir_all(parent).map_err(|e| MeowError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(&self.settings_file, render_settings(&self.values)).map_err(|e| {
            MeowError::IoError {
                path: self.settings_file.clone(),
                source: e,
            }
        })
    }

    fn defaults() -> BTreeMap<String, String> {
        let mut defaults = BTreeMap::new();
        defaults.insert("registry-url".to_string(), DEFAULT_REGISTRY_URL.to_string());
        defaults.insert("aur-helper".to_string(), "yay".to_string());
        defaults.insert("http-timeout".to_string(), "10".to_string());
        defaults.insert("query-timeout".to_string(), "30".to_string());
        defaults.insert("packages-dir".to_string(), String::new()); // Empty = XDG data dir
        defaults.insert("flathub-repo".to_string(), DEFAULT_FLATHUB_REPO.to_string());
        defaults.insert("api-key".to_string(), String::new());
        defaults.insert("color".to_string(), "auto".to_string());
        defaults
    }
}

fn env_override(suffix: &str) -> Option<String> {
    std::env::var(project_identity::env_key(suffix))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn validate_key(key: &str) -> Result<()> {
    if !VALID_KEYS.contains(&key) {
        return Err(MeowError::ConfigError(format!(
            "Unknown setting: '{}'. Valid settings: {}",
            key,
            VALID_KEYS.join(", ")
        )));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| {
        Err(MeowError::ConfigError(format!(
            "Invalid value for '{}': '{}'. Valid: {}",
            key, value, valid
        )))
    };

    match key {
        "color" => {
            if !["auto", "always", "never"].contains(&value) {
                return invalid("auto, always, never");
            }
        }
        "http-timeout" | "query-timeout" => {
            if value.parse::<u64>().map(|s| s == 0).unwrap_or(true) {
                return invalid("a positive number of seconds");
            }
        }
        "registry-url" | "flathub-repo" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return invalid("an http:// or https:// URL");
            }
        }
        "aur-helper" => {
            if value.trim().is_empty() || value.contains(char::is_whitespace) {
                return invalid("a single command name such as yay or paru");
            }
        }
        _ => {}
    }

    Ok(())
}

/// Parse `settings { key value }` (top-level `key value` nodes are accepted too).
fn parse_settings(content: &str) -> Result<BTreeMap<String, String>> {
    let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        MeowError::ConfigError(format!("Settings parsing error: {}", e))
    })?;

    let mut values = BTreeMap::new();
    for node in doc.nodes() {
        if node.name().value() == "settings" {
            if let Some(children) = node.children() {
                for child in children.nodes() {
                    collect_setting(child, &mut values);
                }
            }
        } else {
            collect_setting(node, &mut values);
        }
    }

    Ok(values)
}

fn collect_setting(node: &kdl::KdlNode, values: &mut BTreeMap<String, String>) {
    let key = node.name().value();
    let Some(entry) = node.entries().first() else {
        return;
    };

    let value = entry.value();
    let text = if let Some(s) = value.as_string() {
        s.to_string()
    } else if let Some(n) = value.as_integer() {
        n.to_string()
    } else if let Some(b) = value.as_bool() {
        b.to_string()
    } else {
        return;
    };

    values.insert(key.to_string(), text);
}

fn render_settings(values: &BTreeMap<String, String>) -> String {
    let mut content = format!(
        "// {} settings\n// Generated by `{}`\n\nsettings {{\n",
        project_identity::DISPLAY_NAME,
        project_identity::cli_with("settings set")
    );
    for (key, value) in values {
        if value.is_empty() {
            continue;
        }
        content.push_str(&format!("    {} {:?}\n", key, value));
    }
    content.push_str("}\n");
    content
}

#[cfg(test)]
mod tests;
