use crate::config::settings::Settings;
use crate::core::types::Source;
use crate::core::version::parse_info_fields;
use crate::error::{MeowError, Result};
use crate::packages::command_exec::run_query;
use crate::traits::BackendProvider;
use crate::ui as output;
use crate::utils::{action_log, sanitize};

/// Order in which sources are probed.
pub const CHECK_ORDER: [Source; 4] = [Source::Pacman, Source::Aur, Source::Flatpak, Source::Registry];

/// Fields shown by `check --details`, in display order.
pub const DETAIL_FIELDS: &[&str] = &[
    "Repository",
    "Name",
    "Version",
    "Description",
    "URL",
    "Licenses",
    "Depends On",
    "Download Size",
    "Installed Size",
];

/// Which sources report the package as existing.
pub fn available_sources(backends: &dyn BackendProvider, name: &str) -> Vec<Source> {
    CHECK_ORDER
        .iter()
        .copied()
        .filter(|&source| match backends.backend(source) {
            Ok(backend) => backend.exists(name),
            Err(e) => {
                output::verbose(&format!("{} unavailable: {}", source.display_name(), e));
                false
            }
        })
        .collect()
}

pub fn run(
    backends: &dyn BackendProvider,
    settings: &Settings,
    name: &str,
    details: bool,
) -> Result<()> {
    sanitize::validate_package_name(name)?;

    let found = available_sources(backends, name);
    action_log::log_action(&format!("Checked availability of {}", name));

    if found.is_empty() {
        return Err(MeowError::NotFound(format!(
            "{} is not available from any source",
            name
        )));
    }

    let names: Vec<&str> = found.iter().map(|s| s.display_name()).collect();
    output::success(&format!("{} is available from: {}", name, names.join(", ")));

    if details {
        show_details(settings, name, &found);
    }

    Ok(())
}

/// `-Si` info from the first repository source that has the package.
fn show_details(settings: &Settings, name: &str, found: &[Source]) {
    let program = if found.contains(&Source::Pacman) {
        "pacman".to_string()
    } else if found.contains(&Source::Aur) {
        settings.aur_helper()
    } else {
        output::info("Details are only available for pacman and AUR packages");
        return;
    };

    let output = match run_query(
        &program,
        &["-Si".to_string(), name.to_string()],
        settings.query_timeout(),
    ) {
        Ok(output) if output.status.success() => output,
        Ok(_) => {
            output::warning(&format!("{} -Si {} returned no details", program, name));
            return;
        }
        Err(e) => {
            output::warning(&format!("Could not query details: {}", e));
            return;
        }
    };

    output::header(&format!("Details for {}", name));
    let raw = String::from_utf8_lossy(&output.stdout);
    for (key, value) in parse_info_fields(&raw, DETAIL_FIELDS) {
        output::keyval(&key, &value);
    }
}
