//! Simple spinner for tasks without known duration.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner shown while the classpath is indexed and the closure computed.
///
/// A hidden spinner (see [`Spinner::hidden`]) accepts the same calls and
/// draws nothing, for quiet or non-interactive runs.
///
/// # Examples
///
/// ```no_run
/// use classreach_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Indexing classpath...");
/// spinner.set_message("Resolving...");
/// spinner.finish("Resolved 42 classes");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Start a visible spinner only when `show` is set.
    pub fn maybe(show: bool, message: &str) -> Self {
        if show { Self::new(message) } else { Self::hidden() }
    }

    /// Update spinner message while it's running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish spinner with a green checkmark.
    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(format!("{} {}", "✓".green(), message));
    }

    /// Finish spinner with a red X.
    pub fn fail(&self, message: &str) {
        self.pb.finish_with_message(format!("{} {}", "✗".red(), message));
    }

    /// Remove the spinner line without a final message.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
