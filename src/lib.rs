pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod packages;
pub mod project_identity;
pub mod state;
pub mod traits;
pub mod ui;
pub mod utils;

use clap::Parser;
use std::process::exit;

/// Run meow CLI entrypoint.
pub fn run_cli() {
    // 1. Signal handling
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        ui::warning("Operation cancelled by user.");
        exit(130);
    }) {
        ui::warning(&format!("Could not install Ctrl-C handler: {}", e));
    }

    // 2. Parse & Run
    let args = cli::args::Cli::parse_from(cli::dispatcher::normalize_legacy_flags(
        std::env::args_os(),
    ));
    ui::set_quiet(args.global.quiet);
    ui::set_verbose(args.global.verbose);

    if let Err(e) = cli::dispatcher::dispatch(&args) {
        ui::error(&format!("{}", e));
        exit(1);
    }
}
