//! Input validation for names that end up as process arguments.

use crate::error::{MeowError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Allows: alphanumeric, dash, underscore, dot, plus, at sign, colon, slash
static SAFE_PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9@._+:/-]+$").expect("Invalid regex pattern"));

static SHELL_DANGEROUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[;`$(){}|&<>\\'"\s]"#).expect("Invalid regex pattern"));

const MAX_NAME_LEN: usize = 256;

/// Validate a package name before it reaches a backend.
///
/// Names are passed as discrete argv entries, never through a shell, but a
/// leading dash would still be read as an option by pacman or flatpak.
pub fn validate_package_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(MeowError::InvalidPackageName {
            name: name.chars().take(64).collect(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return reject("name cannot be empty");
    }

    if name.len() > MAX_NAME_LEN {
        return reject("name too long (max 256 chars)");
    }

    if name.starts_with('-') {
        return reject("name cannot start with '-'");
    }

    if SHELL_DANGEROUS.is_match(name) {
        return reject("contains unsafe characters");
    }

    if !SAFE_PACKAGE_NAME.is_match(name) {
        return reject("contains invalid characters");
    }

    Ok(())
}

/// Registry names become directory names under the packages dir.
pub fn validate_checkout_name(name: &str) -> Result<()> {
    validate_package_name(name)?;
    if name.contains('/') || name == "." || name.contains("..") {
        return Err(MeowError::InvalidPackageName {
            name: name.to_string(),
            reason: "cannot be used as a directory name".to_string(),
        });
    }
    Ok(())
}

pub fn is_url(value: &str) -> bool {
    value.starts_with("http://")
        || value.starts_with("https://")
        || value.starts_with("git@")
        || value.starts_with("ssh://")
}
