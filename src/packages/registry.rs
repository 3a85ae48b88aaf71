//! Backend factory.

use crate::api::client::MeowApiClient;
use crate::api::flathub::FlathubClient;
use crate::config::settings::Settings;
use crate::core::types::Source;
use crate::error::Result;
use crate::packages::aur::AurBackend;
use crate::packages::flatpak::FlatpakBackend;
use crate::packages::meow::MeowBackend;
use crate::packages::pacman::PacmanBackend;
use crate::packages::traits::Backend;
use crate::traits::BackendProvider;

/// Build the adapter for `source` from the user's settings.
pub fn create_backend(source: Source, settings: &Settings) -> Result<Box<dyn Backend>> {
    let query_timeout = settings.query_timeout();

    Ok(match source {
        Source::Pacman => Box::new(PacmanBackend::new(query_timeout)),
        Source::Aur => Box::new(AurBackend::new(&settings.aur_helper(), query_timeout)),
        Source::Flatpak => Box::new(FlatpakBackend::new(
            FlathubClient::new(settings.http_timeout())?,
            &settings.flathub_repo(),
            query_timeout,
        )),
        Source::Registry => Box::new(MeowBackend::new(
            MeowApiClient::from_settings(settings)?,
            settings.packages_dir()?,
        )),
    })
}

/// `BackendProvider` over `create_backend`.
pub struct SettingsBackends {
    settings: Settings,
}

impl SettingsBackends {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl BackendProvider for SettingsBackends {
    fn backend(&self, source: Source) -> Result<Box<dyn Backend>> {
        create_backend(source, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn every_source_has_a_backend() {
        let dir = tempdir().expect("tempdir");
        let settings = Settings::load_from(&dir.path().join("settings.kdl")).expect("defaults");
        let provider = SettingsBackends::new(settings);
        for source in Source::MENU {
            let backend = provider.backend(source).expect("backend");
            assert_eq!(backend.source(), source);
        }
    }
}
