//! Formatting utilities for counts, durations and closure summaries.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use classreach_graph::{Closure, RootKind};

use super::colors_enabled;

/// Format duration in human-readable format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use classreach_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{total_ms}ms")
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// `1 class`, `3 classes`.
///
/// ```
/// use classreach_cli::ui::format_count;
///
/// assert_eq!(format_count(1, "class", "classes"), "1 class");
/// assert_eq!(format_count(0, "class", "classes"), "0 classes");
/// ```
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Print a closure summary to stderr: where classes came from and how many
/// diagnostics were recorded.
pub fn print_closure_summary(closure: &Closure, elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let from_archives = closure
        .classes
        .iter()
        .filter(|class| class.kind == RootKind::Archive)
        .count();
    let from_directories = closure.len() - from_archives;
    let diagnostics = &closure.diagnostics;

    let rows = [
        ("roots", closure.roots.len()),
        ("from directories", from_directories),
        ("from archives", from_archives),
        ("unresolved", diagnostics.unresolved.len()),
        ("parse failures", diagnostics.parse_failures.len()),
        ("shadowed", diagnostics.ambiguous.len()),
    ];

    let rule = "─".repeat(width);
    let total = format!(
        "{} in {}",
        format_count(closure.len(), "class", "classes"),
        format_duration(elapsed)
    );

    if colors_enabled() {
        eprintln!("\n{}", "Closure Summary".bold().underline());
        eprintln!("{rule}");
        for (label, count) in rows {
            eprintln!("  {} {:<18}{}", "▸".blue(), label, count.to_string().bright_white().bold());
        }
        eprintln!("{rule}");
        eprintln!("  {} {}", "Total:".bold(), total.green());
    } else {
        eprintln!("\nClosure Summary");
        eprintln!("{rule}");
        for (label, count) in rows {
            eprintln!("  ▸ {label:<18}{count}");
        }
        eprintln!("{rule}");
        eprintln!("  Total: {total}");
    }
}
