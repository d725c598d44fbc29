//! Terminal UI utilities: status lines, a spinner and closure summaries.
//!
//! Everything here writes to stderr. Command results go to stdout through
//! the command modules so they can be piped.
//!
//! # Examples
//!
//! ```no_run
//! use classreach_cli::ui;
//!
//! ui::init_colors(false);
//!
//! let spinner = ui::Spinner::new("Resolving...");
//! spinner.finish("Resolved 42 classes");
//!
//! ui::warning("2 unresolved classes");
//! ```

mod format;
mod messages;
mod spinner;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_count, format_duration, print_closure_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

static COLORS: AtomicBool = AtomicBool::new(false);

/// Check if running in a CI environment.
///
/// Detects common CI environment variables from GitHub Actions, GitLab CI,
/// CircleCI, and Travis CI.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var_os(var).is_some())
}

/// Check if color output should be enabled, for status lines and logs alike.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// stderr terminal decides.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

/// Decide once whether status lines are colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Whether an animated spinner makes sense for this process.
pub fn interactive(quiet: bool) -> bool {
    !quiet && !is_ci() && console::user_attended_stderr()
}
