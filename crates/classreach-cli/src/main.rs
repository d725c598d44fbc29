//! classreach CLI - transitive class dependency closure for JVM classpaths.
//!
//! This is the main entry point. It handles command-line argument parsing,
//! logging initialization, and command dispatch.

use clap::Parser;
use classreach_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let global = args.global();
    let result = match args.command {
        cli::Command::Imports(imports_args) => commands::imports_execute(&global, imports_args),
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(&global, resolve_args),
        cli::Command::Check(check_args) => commands::check_execute(&global, check_args),
    };

    result.map_err(error::cli_error_to_miette)
}
