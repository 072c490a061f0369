//! Console styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when the
//! stream is not a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used for completed work
pub const CHECK: &str = "✓";

/// Semantic styles for console text
pub trait Stylize {
    /// De-emphasized text
    fn muted(&self) -> String;
    /// Headings and names
    fn emphasis(&self) -> String;
    /// Values worth spotting
    fn accent(&self) -> String;
    /// Successful outcomes
    fn success(&self) -> String;
    /// Failures
    fn error(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Styled arrow prefix
pub fn arrow() -> String {
    "→".muted()
}
