//! Output formatting for command results.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Renders `data` as JSON, or with `text` for table output.
pub fn render<T, F>(data: &T, format: OutputFormat, text: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Table => Ok(text()),
    }
}

/// Print a command result to stdout
pub fn print_result(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Success message styled for the terminal
pub fn success(message: &str) -> String {
    message.green().to_string()
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow(), message);
}
