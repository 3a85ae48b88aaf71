//! Dependency builder
//!
//! Installs the dependencies a registry package declares in a
//! `requirements.{kdl,json,txt}` file. Failures are loud but never stop the
//! remaining items.

use crate::config::settings::Settings;
use crate::error::{MeowError, Result};
use crate::packages::command_exec;
use crate::packages::traits::ExecStatus;
use crate::ui as output;
use crate::utils::{action_log, sanitize};
use kdl::KdlDocument;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Checked in this order; the first one present wins.
pub const REQUIREMENT_FILES: &[&str] = &["requirements.kdl", "requirements.json", "requirements.txt"];

/// Section key -> items, in file order per section.
pub type Requirements = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Git,
    Pacman,
    Pip,
    Aur,
}

impl Section {
    pub fn from_key(key: &str) -> Option<Section> {
        match key {
            "installfromgit" => Some(Section::Git),
            "installfrompacman" => Some(Section::Pacman),
            "installfrompip" => Some(Section::Pip),
            "installfromaur" => Some(Section::Aur),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Git => "git",
            Section::Pacman => "pacman",
            Section::Pip => "pip",
            Section::Aur => "aur",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Installs one requirement item, non-interactively.
pub trait RequirementInstaller {
    fn install(&self, section: Section, item: &str) -> Result<ExecStatus>;
}

/// Real installer: `git clone`, `sudo pacman -S --noconfirm`, `pip install`,
/// `<helper> -S --noconfirm`.
pub struct SystemInstaller {
    aur_helper: String,
    workdir: PathBuf,
}

impl SystemInstaller {
    pub fn new(aur_helper: &str, workdir: &Path) -> Self {
        Self {
            aur_helper: aur_helper.to_string(),
            workdir: workdir.to_path_buf(),
        }
    }

    pub fn command_for(&self, section: Section, item: &str) -> (String, Vec<String>, bool) {
        let args = |parts: &[&str]| parts.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        match section {
            Section::Git => ("git".to_string(), args(&["clone", item]), false),
            Section::Pacman => ("pacman".to_string(), args(&["-S", "--noconfirm", item]), true),
            Section::Pip => ("pip".to_string(), args(&["install", item]), false),
            Section::Aur => (self.aur_helper.clone(), args(&["-S", "--noconfirm", item]), false),
        }
    }
}

impl RequirementInstaller for SystemInstaller {
    fn install(&self, section: Section, item: &str) -> Result<ExecStatus> {
        validate_item(section, item)?;
        let (program, args, elevated) = self.command_for(section, item);
        command_exec::run_mutating(&program, &args, elevated, Some(&self.workdir))
    }
}

fn validate_item(section: Section, item: &str) -> Result<()> {
    match section {
        Section::Pacman | Section::Aur => sanitize::validate_package_name(item),
        Section::Git | Section::Pip if item.starts_with('-') || item.trim().is_empty() => {
            Err(MeowError::InvalidPackageName {
                name: item.to_string(),
                reason: "not a valid requirement".to_string(),
            })
        }
        Section::Git | Section::Pip => Ok(()),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub installed: Vec<String>,
    /// (item, section label)
    pub failed: Vec<(String, String)>,
    pub unknown_sections: Vec<String>,
}

pub fn find_requirements(dir: &Path) -> Option<PathBuf> {
    REQUIREMENT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

pub fn load_requirements(path: &Path) -> Result<Requirements> {
    let content = fs::read_to_string(path).map_err(|e| MeowError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("kdl") => parse_kdl(&content),
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("txt") => Ok(parse_txt(&content)),
        _ => Err(MeowError::ConfigError(format!(
            "Unsupported requirements format: {}. Use .kdl, .json or .txt",
            path.display()
        ))),
    }
}

/// `installfrompacman "git" "base-devel"` or child nodes:
///
/// ```kdl
/// installfrompip {
///     requests
///     "rich>=13"
/// }
/// ```
pub fn parse_kdl(content: &str) -> Result<Requirements> {
    let doc: KdlDocument = content.parse()?;
    let mut requirements = Requirements::new();

    for node in doc.nodes() {
        let items = requirements
            .entry(node.name().value().to_string())
            .or_default();

        for entry in node.entries() {
            if entry.name().is_none()
                && let Some(value) = entry.value().as_string()
            {
                items.push(value.to_string());
            }
        }

        if let Some(children) = node.children() {
            for child in children.nodes() {
                items.push(child.name().value().to_string());
            }
        }
    }

    Ok(requirements)
}

/// `[section]` headers, one item per line, `#` comments.
pub fn parse_txt(content: &str) -> Requirements {
    let mut requirements = Requirements::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let section = section.trim().to_string();
            requirements.entry(section.clone()).or_default();
            current = Some(section);
        } else if let Some(section) = &current {
            requirements
                .entry(section.clone())
                .or_default()
                .push(line.to_string());
        }
    }

    requirements
}

pub fn install_requirements(
    requirements: &Requirements,
    installer: &dyn RequirementInstaller,
) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for (key, items) in requirements {
        let Some(section) = Section::from_key(key) else {
            output::warning(&format!("Unknown install source: {}", key));
            summary.unknown_sections.push(key.clone());
            continue;
        };

        output::header(&format!("Installing from {}", key));
        for item in items {
            output::indent(&format!("Installing {}...", item), 1);
            let failure = match installer.install(section, item) {
                Ok(status) if status.success => None,
                Ok(status) => Some(status.diagnostic),
                Err(e) => Some(e.to_string()),
            };

            match failure {
                None => summary.installed.push(item.clone()),
                Some(diagnostic) => {
                    print_failure(item, section);
                    output::verbose(&diagnostic);
                    summary.failed.push((item.clone(), section.label().to_string()));
                }
            }
        }
    }

    summary
}

fn print_failure(item: &str, section: Section) {
    let text = format!(
        "[WARNING]    COULD NOT INSTALL {} FROM {}",
        display_item(item),
        section
    );
    let border = "=".repeat(text.chars().count());
    output::warning(&border);
    output::warning(&text);
    output::warning(&border);
}

/// Git URLs are reported by repository name.
fn display_item(item: &str) -> String {
    if sanitize::is_url(item) {
        crate::packages::meow::checkout_name(item)
    } else {
        item.to_string()
    }
}

/// Find, load and install the requirements in `dir`.
pub fn build_dir(dir: &Path, installer: &dyn RequirementInstaller) -> Result<BuildSummary> {
    let path = find_requirements(dir).ok_or_else(|| {
        MeowError::NotFound(format!("No requirements file found in {}", dir.display()))
    })?;
    output::info(&format!("Found requirements file: {}", path.display()));

    let requirements = load_requirements(&path)?;
    Ok(install_requirements(&requirements, installer))
}

pub fn report(summary: &BuildSummary) {
    output::separator();
    if summary.failed.is_empty() {
        output::success(&format!(
            "Done installing dependencies ({} installed)",
            summary.installed.len()
        ));
    } else {
        output::warning(&format!(
            "Dependencies: {} installed, {} failed",
            summary.installed.len(),
            summary.failed.len()
        ));
    }
}

pub fn run(dir: Option<PathBuf>, settings: &Settings) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(MeowError::PathError(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let installer = SystemInstaller::new(&settings.aur_helper(), &dir);
    let summary = build_dir(&dir, &installer)?;
    report(&summary);
    action_log::log_action(&format!(
        "Built dependencies in {}: {} installed, {} failed",
        dir.display(),
        summary.installed.len(),
        summary.failed.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests;
