use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "meow",
    about = "Meta package manager for pacman, the AUR, Flathub and the Meow registry",
    long_about = "Install and update packages from pacman, the AUR, Flathub or the Meow registry.\n\
                  Meow remembers where each package came from, so updates are routed without asking again.",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,

    /// Color output: auto, always or never (overrides the `color` setting)
    #[arg(long, value_name = "WHEN", global = true, value_parser = ["auto", "always", "never"])]
    pub color: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install a package
    Install {
        /// Package name (or a git URL for the Meow registry)
        package: String,

        /// Source: pac, pacman, flathub, fb, fk, flatpak, aur, meow
        #[arg(short = 's', long = "source", visible_alias = "src", value_name = "SOURCE")]
        source: Option<String>,
    },

    /// Update a package, using the recorded source when none is given
    Update {
        package: String,

        /// Source: pac, pacman, flathub, fb, fk, flatpak, aur, meow
        #[arg(short = 's', long = "source", visible_alias = "src", value_name = "SOURCE")]
        source: Option<String>,
    },

    /// Search every source
    Search {
        query: String,

        /// Maximum results per source
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Only verified registry packages
        #[arg(long)]
        verified: bool,
    },

    /// Show which sources provide a package
    Check {
        package: String,

        /// Print repository details (pacman/AUR)
        #[arg(long)]
        details: bool,
    },

    /// Show system information
    Fetch,

    /// Show a registry package
    Info { package: String },

    /// List registry packages
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,

        #[arg(long)]
        verified: bool,
    },

    /// Publish a package to the registry
    Publish {
        name: String,

        #[arg(value_name = "VERSION")]
        pkg_version: String,

        /// Git URL the package is cloned from
        giturl: String,

        #[arg(long)]
        owner: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        license: Option<String>,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Check that the registry is reachable
    Health,

    /// Registry administration (needs MEOW_ADMIN_API_KEY)
    Admin {
        #[command(subcommand)]
        command: AdminSubcommand,
    },

    /// Install the dependencies declared in a requirements file
    Build {
        /// Package directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },

    /// Drop the install record for a package (nothing is uninstalled)
    Forget { package: String },

    /// Manage settings
    Settings {
        #[command(subcommand)]
        command: SettingsSubcommand,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// Mark a package as verified
    Verify { name: String },

    /// Remove the verified mark
    Unverify { name: String },

    /// Delete a package (soft delete unless --hard)
    Delete {
        name: String,

        #[arg(long)]
        hard: bool,
    },

    /// Change package metadata
    Update {
        name: String,

        #[arg(long)]
        owner: Option<String>,

        #[arg(long = "pkg-version", value_name = "VERSION")]
        pkg_version: Option<String>,

        #[arg(long)]
        giturl: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Show server admin info
    Info,
}

#[derive(Subcommand, Debug)]
pub enum SettingsSubcommand {
    /// Show all settings
    Show,

    /// Get a setting value
    Get { key: String },

    /// Set a setting value
    Set { key: String, value: String },

    /// Reset a setting to its default
    Reset { key: String },
}

#[cfg(test)]
mod tests;
