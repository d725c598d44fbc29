//! Check command implementation.
//!
//! Validates configuration and classpath roots without resolving anything.

use std::io::Write;
use std::path::Path;

use classreach_config::{ConfigValidator, FsValidator};
use classreach_graph::ClasspathIndex;
use walkdir::WalkDir;

use crate::cli::{CheckArgs, GlobalArgs};
use crate::commands::utils;
use crate::config::{self, CliOverrides};
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load classreach.toml with the selected profile and environment layers
/// 2. Validate the schema (prefixes, patterns, limits, log level)
/// 3. Check every classpath root exists
/// 4. Index the classpath and print what was found
pub fn execute(global: &GlobalArgs, args: CheckArgs) -> Result<()> {
    let loaded = config::load(global, &CliOverrides::from(&args))?;
    utils::apply_settings(&loaded);
    let config = &loaded.config;

    if !global.quiet {
        match &loaded.source {
            Some(path) => ui::info(&format!("Using {}", path.display())),
            None => ui::warning("No classreach.toml found, using defaults"),
        }
        if let Some(profile) = &global.profile {
            ui::info(&format!("Profile: {profile}"));
        }
    }

    let cwd = utils::working_dir()?;
    FsValidator::new(&cwd).validate(config)?;

    let index = ClasspathIndex::new(&config.classpath.roots).with_hint(utils::CLASSPATH_HINT)?;
    utils::report_skipped_roots(&index, global.quiet);
    let stats = index.stats();
    let directory_classes: usize = index.roots().filter(|root| root.is_dir()).map(count_class_files).sum();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for root in index.roots() {
        writeln!(out, "root\t{}", root.display())?;
    }
    writeln!(out, "directories\t{}", stats.directories)?;
    writeln!(out, "archives\t{}", stats.archives)?;
    writeln!(out, "directory classes\t{directory_classes}")?;
    writeln!(out, "archive classes\t{}", stats.archive_classes)?;

    if !global.quiet {
        ui::success(&format!(
            "Configuration is valid ({} on the classpath)",
            ui::format_count(directory_classes + stats.archive_classes, "class", "classes")
        ));
    }
    Ok(())
}

fn count_class_files(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "class"))
        .count()
}
