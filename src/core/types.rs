use crate::error::MeowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Supported backends.
// To add a package source, add a variant here and update:
// - SOURCE_ALIASES
// - Source::token() / Source::display_name()
// - packages::registry::create_backend()
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// The Meow package registry (git-hosted packages).
    #[serde(rename = "meow")]
    Registry,
    /// Official repositories via pacman.
    #[serde(rename = "pac", alias = "pacman")]
    Pacman,
    /// Arch User Repository via an AUR helper.
    #[serde(rename = "aur")]
    Aur,
    /// Flathub via flatpak.
    #[serde(rename = "flathub", alias = "flatpak", alias = "fb", alias = "fk")]
    Flatpak,
}

/// Source tokens accepted on the command line and in record files.
pub const SOURCE_ALIASES: &[(&str, Source)] = &[
    ("pac", Source::Pacman),
    ("pacman", Source::Pacman),
    ("flathub", Source::Flatpak),
    ("fb", Source::Flatpak),
    ("fk", Source::Flatpak),
    ("flatpak", Source::Flatpak),
    ("aur", Source::Aur),
    ("meow", Source::Registry),
];

pub const SOURCE_TOKENS: &[&str] = &["pac", "pacman", "flathub", "fb", "fk", "flatpak", "aur", "meow"];

impl Source {
    /// Order of the interactive source menu (1-based on screen).
    pub const MENU: [Source; 4] = [Source::Flatpak, Source::Pacman, Source::Aur, Source::Registry];

    /// Look up a source token or alias, case-insensitively.
    pub fn from_token(token: &str) -> Option<Source> {
        let token = token.trim().to_lowercase();
        SOURCE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, source)| *source)
    }

    /// Map an interactive answer: a menu number or any alias token.
    pub fn from_menu_choice(answer: &str) -> Option<Source> {
        let answer = answer.trim();
        if let Ok(index) = answer.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| Self::MENU.get(i))
                .copied();
        }
        Self::from_token(answer)
    }

    /// Canonical token, as written to the install record store.
    pub fn token(&self) -> &'static str {
        match self {
            Source::Registry => "meow",
            Source::Pacman => "pac",
            Source::Aur => "aur",
            Source::Flatpak => "flathub",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Registry => "Meow registry",
            Source::Pacman => "Pacman",
            Source::Aur => "AUR",
            Source::Flatpak => "Flathub",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            Source::Registry => "meow",
            Source::Pacman => "pacman",
            Source::Aur => "aur",
            Source::Flatpak => "flatpak",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Source {
    type Err = MeowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::from_token(s).ok_or_else(|| MeowError::UnknownSource(s.to_string()))
    }
}

/// Mutating operations a backend can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Update,
}

impl Action {
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Install => "installed",
            Action::Update => "updated",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Install => f.write_str("install"),
            Action::Update => f.write_str("update"),
        }
    }
}

/// Result of a mutating backend operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        version: String,
        external_id: Option<String>,
    },
    Failed {
        diagnostic: String,
    },
    Cancelled,
    /// The backend could not map the name to an installable identifier.
    NotFound,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Version sentinel when a backend cannot report one.
pub const UNKNOWN_VERSION: &str = "unknown";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_maps_to_its_canonical_source() {
        assert_eq!(Source::from_token("pac"), Source::from_token("pacman"));
        for alias in ["fb", "fk", "flatpak", "flathub"] {
            assert_eq!(Source::from_token(alias), Some(Source::Flatpak));
        }
        assert_eq!(Source::from_token("aur"), Some(Source::Aur));
        assert_eq!(Source::from_token("meow"), Some(Source::Registry));
        assert_eq!(Source::from_token(" PACMAN "), Some(Source::Pacman));
    }

    #[test]
    fn token_list_matches_alias_table() {
        let from_table: Vec<_> = SOURCE_ALIASES.iter().map(|(t, _)| *t).collect();
        assert_eq!(from_table, SOURCE_TOKENS);
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(Source::from_token("apt"), None);
        let err = "snap".parse::<Source>().unwrap_err();
        assert!(err.to_string().contains("Unknown source 'snap'"));
    }

    #[test]
    fn menu_choice_accepts_numbers_and_tokens() {
        assert_eq!(Source::from_menu_choice("1"), Some(Source::Flatpak));
        assert_eq!(Source::from_menu_choice("2"), Some(Source::Pacman));
        assert_eq!(Source::from_menu_choice("3"), Some(Source::Aur));
        assert_eq!(Source::from_menu_choice("4"), Some(Source::Registry));
        assert_eq!(Source::from_menu_choice("aur"), Some(Source::Aur));
        assert_eq!(Source::from_menu_choice("0"), None);
        assert_eq!(Source::from_menu_choice("5"), None);
        assert_eq!(Source::from_menu_choice("banana"), None);
    }

    #[test]
    fn serde_uses_canonical_tokens_and_reads_aliases() {
        assert_eq!(serde_json::to_string(&Source::Pacman).unwrap(), "\"pac\"");
        assert_eq!(serde_json::to_string(&Source::Flatpak).unwrap(), "\"flathub\"");
        let parsed: Source = serde_json::from_str("\"pacman\"").unwrap();
        assert_eq!(parsed, Source::Pacman);
        let parsed: Source = serde_json::from_str("\"flatpak\"").unwrap();
        assert_eq!(parsed, Source::Flatpak);
    }
}
