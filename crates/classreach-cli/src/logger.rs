//! Logging setup for the classreach CLI.
//!
//! Library crates log through `tracing` macros. This module installs the
//! subscriber that renders them.
//!
//! - `--verbose` shows debug events from every classreach crate
//! - `--quiet` keeps errors only
//! - `RUST_LOG` is honoured when set
//! - otherwise `settings.log_level` from classreach.toml, applied once the
//!   config is loaded, falling back to warnings
//!
//! Logs go to stderr so stdout stays clean for `--format json`.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::ui;

const CRATES: &[&str] = &["classreach", "classreach_graph", "classreach_config", "classreach_cli"];

struct FilterHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    /// Set when flags or `RUST_LOG` chose the filter; config may not override it.
    pinned: bool,
}

static FILTER: OnceLock<FilterHandle> = OnceLock::new();

/// `classreach=<level>,classreach_graph=<level>,...`
pub fn crate_filter(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified options.
///
/// Call once, before any logging occurs. Later calls are ignored.
///
/// # Examples
///
/// ```rust,no_run
/// use classreach_cli::logger::init_logger;
///
/// // Debug logging
/// init_logger(true, false, false);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let (filter, pinned) = if verbose {
        (EnvFilter::new(crate_filter("debug")), true)
    } else if quiet {
        (EnvFilter::new(crate_filter("error")), true)
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => (filter, true),
            Err(_) => (EnvFilter::new(crate_filter("warn")), false),
        }
    };

    let (filter_layer, handle) = reload::Layer::new(filter);
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && ui::should_use_color())
        .compact();

    let installed = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .is_ok();
    if installed {
        let _ = FILTER.set(FilterHandle { handle, pinned });
    }
}

/// Apply `settings.log_level` from the loaded config.
///
/// No-op when `--verbose`, `--quiet` or `RUST_LOG` already decided, or when
/// the logger was never initialized.
pub fn apply_config_level(level: Option<&str>) {
    let (Some(level), Some(filter)) = (level, FILTER.get()) else {
        return;
    };
    if filter.pinned {
        return;
    }
    let level = level.to_ascii_lowercase();
    if let Err(err) = filter.handle.reload(EnvFilter::new(crate_filter(&level))) {
        tracing::debug!(%err, "could not apply configured log level");
    }
}
