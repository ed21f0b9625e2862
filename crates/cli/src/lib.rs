//! Agent Eval CLI Library
//!
//! This library provides the core functionality for the `agent-eval` command-line
//! interface: the command implementations and output formatting.

pub mod commands;
pub mod output;

pub use commands::CommandContext;
pub use output::{JsonFormatter, OutputFormat, PlainFormatter, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
