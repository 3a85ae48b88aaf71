pub mod aur;
pub mod command_exec;
pub mod flatpak;
pub mod meow;
pub mod pacman;
pub mod registry;
pub mod search_parsing;
pub mod traits;

pub use traits::{Backend, PackageSearchResult, SearchQuery};
