//! Output formatting for CLI

use anyhow::Result;
use serde::{Deserialize, Serialize};

mod formatters;
mod report;
mod table;

pub use formatters::{JsonFormatter, PlainFormatter};
pub use report::{overall_table, source_table, stats_table};
pub use table::TableFormatter;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "table" => Some(Self::Table),
            "plain" => Some(Self::Plain),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format as JSON
    fn format_json(&self) -> Result<String>;

    /// Format as plain text
    fn format_plain(&self) -> Result<String>;
}

/// Default implementation for serializable types
impl<T: Serialize> Formattable for T {
    fn format_json(&self) -> Result<String> {
        JsonFormatter::format(self)
    }

    fn format_plain(&self) -> Result<String> {
        PlainFormatter::format(self)
    }
}

/// Color helpers
pub mod colors {
    use colored::*;

    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn heading(s: &str) -> ColoredString {
        s.bold().cyan()
    }

    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }
}
