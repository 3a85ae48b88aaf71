pub mod resolver;
pub mod types;
pub mod version;
