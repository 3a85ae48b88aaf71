//! Rolling action log (`~/.cache/meowpm/meow.log`).
//!
//! Best effort: failures are reported verbosely and never abort a command.

use crate::error::{MeowError, Result};
use crate::ui as output;
use crate::utils::paths;
use chrono::Local;
use std::fs;
use std::path::Path;

pub const MAX_LINES: usize = 50;

pub fn log_action(message: &str) {
    let path = match paths::action_log_file() {
        Ok(path) => path,
        Err(e) => {
            output::verbose(&format!("Action log unavailable: {}", e));
            return;
        }
    };

    if let Err(e) = append_capped(&path, message, MAX_LINES) {
        output::verbose(&format!("Could not write action log: {}", e));
    }
}

/// Append a timestamped line, keeping only the newest `max_lines`.
pub fn append_capped(path: &Path, message: &str, max_lines: usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MeowError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(MeowError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut lines: Vec<String> = existing.lines().map(str::to_string).collect();
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    lines.push(format!("[{}] {}", timestamp, message.replace('\n', " ")));

    let start = lines.len().saturating_sub(max_lines);
    let mut content = lines[start..].join("\n");
    content.push('\n');

    fs::write(path, content).map_err(|e| MeowError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}
