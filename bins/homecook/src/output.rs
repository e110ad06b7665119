//! Terminal output utilities
//!
//! Status lines, spinners and the terminal rendering of notifications.

use crate::OutputFormat;
use homecook_app::notify::{Level, Notification, Notifier};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a label/value line
    pub fn field(label: &str, value: &str) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Cut `text` to `max` characters, marking the cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Notifications printed as they arrive
pub struct TerminalNotifier {
    format: OutputFormat,
}

impl TerminalNotifier {
    /// Create a notifier for the chosen output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        debug!(id = %notification.id, "Notification");
        let line = match notification.level {
            Level::Success => format!("{} {}", "✓".green(), notification.message),
            Level::Error => format!("{} {}", "✗".red(), notification.message),
            Level::Info => format!("{} {}", "ℹ".blue(), notification.message),
        };
        // Keep stdout clean for JSON consumers
        if self.format == OutputFormat::Json || notification.is_error() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "listing", "listings"), "1 listing");
        assert_eq!(format_count(0, "listing", "listings"), "0 listings");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Pie", 10), "Pie");
        assert_eq!(truncate("Sticky toffee pudding", 10), "Sticky to…");
    }
}
