//! Settings Command
//!
//! Manage meow configuration settings.

use crate::config::settings::{Settings, VALID_KEYS};
use crate::error::{MeowError, Result};
use crate::ui as output;

/// Settings command
#[derive(Debug)]
pub enum SettingsCommand {
    /// Set a setting value
    Set { key: String, value: String },
    /// Get a setting value
    Get { key: String },
    /// Show all settings
    Show,
    /// Reset setting to default
    Reset { key: String },
}

/// Run the settings command
pub fn run(command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(key.clone(), value.clone())?;
            output::success(&format!("Set {} = {}", key, display_value(&key, &value)));
        }
        SettingsCommand::Get { key } => {
            let settings = Settings::load()?;
            match settings.get(&key) {
                Some(value) => {
                    println!("{} = {}", key, display_value(&key, value));
                }
                None => {
                    return Err(MeowError::ConfigError(format!(
                        "Setting '{}' not found. Valid settings: {}",
                        key,
                        VALID_KEYS.join(", ")
                    )));
                }
            }
        }
        SettingsCommand::Show => {
            let settings = Settings::load()?;
            show_all_settings(&settings);
        }
        SettingsCommand::Reset { key } => {
            let mut settings = Settings::load()?;
            settings.reset(&key)?;
            output::success(&format!("Reset {} to default", key));
        }
    }

    Ok(())
}

/// Secrets are never echoed back.
fn display_value(key: &str, value: &str) -> String {
    if key == "api-key" && !value.is_empty() {
        "********".to_string()
    } else if value.is_empty() {
        "(default)".to_string()
    } else {
        value.to_string()
    }
}

fn show_all_settings(settings: &Settings) {
    output::header("Current Settings");

    for key in VALID_KEYS {
        let value = settings.get(key).map(String::as_str).unwrap_or("");
        println!("  {}: {}", key, display_value(key, value));
    }

    println!();
    output::info("Effective values:");
    output::keyval("registry", &settings.registry_url());
    output::keyval("aur helper", &settings.aur_helper());
    match settings.packages_dir() {
        Ok(dir) => output::keyval("packages", &dir.display().to_string()),
        Err(e) => output::warning(&format!("packages dir: {}", e)),
    }
    output::keyval(
        "api key",
        if settings.api_key().is_some() { "set" } else { "not set" },
    );
}
