//! `classreach resolve`: transitive closure from root classes.

use std::io::Write;
use std::time::Instant;

use classreach_config::ClassreachConfig;
use classreach_graph::{ClasspathIndex, Closure, ClosureResolver, DependencyChain, Diagnostics};
use serde::Serialize;
use tracing::debug;

use crate::cli::{GlobalArgs, OutputFormat, ResolveArgs};
use crate::commands::utils;
use crate::config::{self, CliOverrides};
use crate::error::{CliError, Result, ResultExt};
use crate::ui::{self, Spinner};

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    #[serde(flatten)]
    closure: &'a Closure,
    #[serde(skip_serializing_if = "Option::is_none")]
    why: Option<&'a WhyReport<'a>>,
}

#[derive(Debug, Serialize)]
struct WhyReport<'a> {
    target: &'a str,
    chain: Option<DependencyChain>,
}

/// Execute the resolve command.
///
/// # Process
///
/// 1. Load configuration with the command's flags layered on top
/// 2. Index the classpath and turn each ROOT into a root artifact
/// 3. Compute the closure
/// 4. Print it to stdout, diagnostics and the summary to stderr
///
/// Under `strict`, error diagnostics turn into a failed exit after the
/// closure has been printed.
pub fn execute(global: &GlobalArgs, args: ResolveArgs) -> Result<()> {
    let loaded = config::load(global, &CliOverrides::from(&args))?;
    utils::apply_settings(&loaded);
    let config = &loaded.config;

    if config.classpath.roots.is_empty() {
        debug!("no classpath roots configured; only class-file roots can be resolved");
    }

    let started = Instant::now();
    let spinner = Spinner::maybe(ui::interactive(global.quiet), "Indexing classpath...");

    let closure = match compute(config, &args, global.quiet, &spinner) {
        Ok(closure) => closure,
        Err(err) => {
            spinner.fail("Resolution failed");
            return Err(err);
        }
    };
    spinner.clear();
    let elapsed = started.elapsed();

    let chain = args.why.as_deref().map(|target| WhyReport {
        target,
        chain: closure.chain_to(target),
    });

    write_closure(&closure, chain.as_ref(), args.format)?;

    if !global.quiet {
        report_diagnostics(&closure.diagnostics);
        if let (Some(why), OutputFormat::Text) = (&chain, args.format) {
            report_chain(why);
        }
        ui::print_closure_summary(&closure, elapsed);
    }

    if config.resolve.strict && closure.diagnostics.has_errors() {
        let diagnostics = &closure.diagnostics;
        return Err(CliError::StrictFailure {
            count: diagnostics.parse_failures.len() + diagnostics.unresolved.len(),
        });
    }
    Ok(())
}

fn compute(
    config: &ClassreachConfig,
    args: &ResolveArgs,
    quiet: bool,
    spinner: &Spinner,
) -> Result<Closure> {
    let cwd = utils::working_dir()?;
    let index = ClasspathIndex::new(&config.classpath.roots).with_hint(utils::CLASSPATH_HINT)?;
    utils::report_skipped_roots(&index, quiet);

    let roots = utils::resolve_roots(&index, &args.roots, &cwd)?;
    debug!(roots = roots.len(), classpath = ?index, "resolving closure");

    spinner.set_message("Resolving...");
    let resolver = ClosureResolver::new(&index, config.name_filter()?, config.resolve.options());
    Ok(resolver.resolve_imported_classes(roots)?)
}

fn write_closure<'a>(closure: &'a Closure, why: Option<&'a WhyReport<'a>>, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            for class in &closure.classes {
                writeln!(out, "{}\t{}", class.class_name, class.location())?;
            }
        }
        OutputFormat::Json => {
            let report = ResolveReport { closure, why };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn report_diagnostics(diagnostics: &Diagnostics) {
    for failure in &diagnostics.parse_failures {
        ui::error(&format!(
            "Could not parse {} ({}): {}",
            failure.class_name, failure.location, failure.message
        ));
    }
    for unresolved in &diagnostics.unresolved {
        ui::warning(&format!(
            "{} referenced from {} is not on the classpath",
            unresolved.name, unresolved.referenced_from
        ));
    }
    for ambiguous in &diagnostics.ambiguous {
        let shadowed = ambiguous
            .shadowed
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ui::info(&format!(
            "{} is defined in {} and shadows {}",
            ambiguous.name,
            ambiguous.chosen.display(),
            shadowed
        ));
    }
}

fn report_chain(why: &WhyReport<'_>) {
    match &why.chain {
        Some(chain) => ui::info(&format!(
            "Why {}: {} ({} hop{})",
            why.target,
            chain.format_chain(),
            chain.depth,
            if chain.depth == 1 { "" } else { "s" }
        )),
        None => ui::warning(&format!("{} is not reachable from the given roots", why.target)),
    }
}
