//! Presentation layer for toolweave
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, StrategyArg, parse_key_value};
pub use output::{ConsoleFormatter, JsonFormatter, OutputFormatter, formatter_for};
