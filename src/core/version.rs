//! Version extraction from `key : value` style backend output
//! (`pacman -Qi`, `yay -Qi`, `flatpak info`).

use regex::Regex;
use std::sync::LazyLock;

pub const VERSION_NOT_FOUND: &str = "Version not found";

static VERSION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*Version[ \t]*:[ \t]*(\S.*?)[ \t]*\r?$").expect("Invalid regex pattern"));

static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z ]*?)\s*:\s*(.*)$").expect("Invalid regex pattern"));

/// Return the value of the first `Version : …` line, or [`VERSION_NOT_FOUND`].
pub fn extract_version(raw_output: &str) -> String {
    VERSION_LINE
        .captures(raw_output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| VERSION_NOT_FOUND.to_string())
}

/// Collect the requested fields from `key : value` output, in the order given.
///
/// Lines without a `key :` prefix continue the previous field.
pub fn parse_info_fields(raw_output: &str, fields: &[&str]) -> Vec<(String, String)> {
    let mut values: Vec<(String, String)> = Vec::new();
    let mut current: Option<String> = None;

    for line in raw_output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = FIELD_LINE.captures(line) {
            let key = caps[1].trim().to_string();
            let value = caps[2].trim().to_string();
            if fields.contains(&key.as_str()) {
                values.push((key.clone(), value));
            }
            current = Some(key);
        } else if let Some(key) = &current
            && let Some(entry) = values.iter_mut().rev().find(|(k, _)| k == key)
        {
            entry.1.push(' ');
            entry.1.push_str(line.trim());
        }
    }

    let mut ordered = Vec::new();
    for field in fields {
        if let Some(pos) = values.iter().position(|(k, _)| k == field) {
            ordered.push(values.remove(pos));
        }
    }
    ordered
}
