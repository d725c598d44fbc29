//! `classreach imports`: direct references of one class file.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use classreach_config::ClassreachConfig;
use classreach_graph::{ClasspathIndex, ClosureResolver};
use serde::Serialize;

use crate::cli::{GlobalArgs, ImportsArgs, OutputFormat};
use crate::commands::utils;
use crate::config::{self, CliOverrides};
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

#[derive(Debug, Serialize)]
struct ImportsReport<'a> {
    class_file: &'a Path,
    imports: &'a BTreeSet<String>,
}

/// Execute the imports command.
///
/// Prints every filtered, canonical class name the file references,
/// including its own name when the filter admits it.
pub fn execute(global: &GlobalArgs, args: ImportsArgs) -> Result<()> {
    let loaded = config::load(global, &CliOverrides::from(&args))?;
    utils::apply_settings(&loaded);

    let cwd = utils::working_dir()?;
    let class_file = utils::resolve_path(&args.class_file, &cwd);
    if !fs::metadata(&class_file).with_path(&class_file)?.is_file() {
        return Err(CliError::InvalidArgument(format!(
            "{} is not a class file",
            class_file.display()
        )));
    }

    let imports = find_imports(&loaded.config, &class_file)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => {
            for name in &imports {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => {
            let report = ImportsReport {
                class_file: &class_file,
                imports: &imports,
            };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }

    if !global.quiet && args.format == OutputFormat::Text {
        ui::info(&format!(
            "{} referenced by {}",
            ui::format_count(imports.len(), "class", "classes"),
            class_file.display()
        ));
    }
    Ok(())
}

fn find_imports(config: &ClassreachConfig, class_file: &Path) -> Result<BTreeSet<String>> {
    // Imports never consult the classpath.
    let index = ClasspathIndex::new(std::iter::empty::<&Path>())?;
    let resolver = ClosureResolver::new(&index, config.name_filter()?, config.resolve.options());
    Ok(resolver.find_imported_classes(class_file)?)
}
