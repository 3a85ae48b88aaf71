pub mod action_log;
pub mod paths;
pub mod platform;
pub mod sanitize;
