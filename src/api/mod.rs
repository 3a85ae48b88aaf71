//! HTTP clients for the Meow registry and the Flathub search API.

pub mod client;
pub mod flathub;
pub mod types;
