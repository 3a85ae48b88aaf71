//! Central project identity contract.
//!
//! Single source of truth for runtime identity values (binary name,
//! directory names, environment variable prefix).

pub const DISPLAY_NAME: &str = "Meow";
pub const BINARY_NAME: &str = "meow";
pub const STABLE_PROJECT_ID: &str = "meowpm";
pub const PROJECT_QUALIFIER: &str = "org";
pub const PROJECT_ORG: &str = "meowpm";
pub const ENV_PREFIX: &str = "MEOW";
pub const STATE_FILE_NAME: &str = "info.json";
pub const SETTINGS_FILE_NAME: &str = "settings.kdl";
pub const ACTION_LOG_FILE_NAME: &str = "meow.log";
pub const USER_AGENT: &str = concat!("meowpm/", env!("CARGO_PKG_VERSION"));

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn cli_with(args: &str) -> String {
    format!("{} {}", BINARY_NAME, args)
}
