pub mod build;
pub mod check;
pub mod completions;
pub mod fetch;
pub mod forget;
pub mod install;
pub mod registry;
pub mod search;
pub mod settings;
