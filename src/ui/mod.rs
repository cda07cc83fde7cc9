//! CLI UI utilities for terminal output.
//!
//! Colored output, status icons, and styled formatting for the run
//! summary. Colors degrade to plain text when stdout is not a terminal.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a styled status message.
pub fn print_status(status: Status, message: &str) {
    let icon = status_icon(status);
    if !is_terminal() {
        println!("{} {}", icon, message);
        return;
    }
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), message),
        Status::Error => println!("{} {}", icon.red().bold(), message),
        Status::Warning => println!("{} {}", icon.yellow().bold(), message),
        Status::Info => println!("{} {}", icon.cyan().bold(), message),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    if is_terminal() {
        println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
    } else {
        println!("━━━ {} ━━━", title);
    }
}

/// Truncate a string adding an ellipsis when it exceeds `max` characters.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
