//! Command-line interface definition for classreach.
//!
//! # Command Structure
//!
//! - `classreach imports` - direct references of a single class file
//! - `classreach resolve` - transitive closure from one or more roots
//! - `classreach check` - configuration and classpath validation

mod commands;
pub mod enums;
#[cfg(test)]
mod tests;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{CheckArgs, Command, FilterArgs, ImportsArgs, ResolveArgs};
pub use enums::*;

/// classreach - find every class a JVM class transitively needs
#[derive(Parser, Debug)]
#[command(
    name = "classreach",
    version,
    about = "Transitive class dependency closure for JVM classpaths",
    long_about = "classreach reads compiled .class files, follows every class they reference\n\
                  through an ordered classpath of directories and jars, and reports the full\n\
                  closure together with unresolved names and unreadable class files."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    ///
    /// Status lines and the progress spinner are hidden. Results are still
    /// written to stdout.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a classreach.toml (defaults to ./classreach.toml if present)
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Configuration profile to apply from [profiles.<NAME>]
    #[arg(short = 'p', long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub quiet: bool,
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
}

impl Cli {
    pub fn global(&self) -> GlobalArgs {
        GlobalArgs {
            quiet: self.quiet,
            config: self.config.clone(),
            profile: self.profile.clone(),
        }
    }
}
