//! Miette diagnostic conversion for CLI errors.

use classreach_graph::ResolveError;
use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => match e.hint() {
            Some(hint) => miette::miette!(help = hint.to_string(), "Configuration error: {}", e),
            None => miette::miette!("Configuration error: {}", e),
        },
        CliError::Resolve(e) => resolve_error_to_miette(e),
        CliError::RootNotFound { name } => miette::miette!(
            help = "Add the directory or jar that defines it with --classpath, or pass the .class file path",
            "Root class '{}' was not found on the classpath",
            name
        ),
        CliError::StrictFailure { count } => miette::miette!(
            help = "Rerun without --strict to see the closure, or fix the classpath",
            "{} error diagnostic(s) in strict mode",
            count
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ResolveError to miette Report
pub fn resolve_error_to_miette(err: ResolveError) -> Report {
    match err {
        ResolveError::TooManyClasses { count, max } => miette::miette!(
            help = "Narrow the traversal with --include / --exclude or raise --max-classes",
            "Closure grew to {} classes (max: {})",
            count,
            max
        ),
        ResolveError::Parse { location, source } => miette::miette!(
            help = "Drop --fail-fast to record the failure and keep going",
            "Failed to parse {}: {}",
            location,
            source
        ),
        other => miette::miette!("{}", other),
    }
}
