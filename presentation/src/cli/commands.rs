//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Strategy override for `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Trigger phrase dispatching a single call
    Trigger,
    /// Rule-based planner output
    Rules,
}

/// CLI arguments for toolweave
#[derive(Parser, Debug)]
#[command(name = "toolweave")]
#[command(author, version, about = "Plan, validate and execute tool calls from natural-language tasks")]
#[command(long_about = r#"
Toolweave turns a natural-language task into tool calls and runs them
against a registry of built-in tools (read_file, write_file, search_files,
run_command, echo) with retries and timeouts.

Configuration files are loaded from (in priority order):
1. TOOLWEAVE_* environment variables
2. --config <path>       Explicit config file
3. ./toolweave.toml      Project-level config
4. ~/.config/toolweave/config.toml   Global config

Example:
  toolweave plan "read config.toml and write summary.txt"
  toolweave run "echo hello world"
  toolweave call search_files --arg query=TODO --arg path=src
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Working directory for tool calls
    #[arg(short = 'C', long, value_name = "DIR", global = true)]
    pub working_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the rule-based plan for a task and its validation
    Plan {
        /// Task description
        task: String,
    },

    /// Rank tools by relevance to a task
    Select {
        /// Task description
        task: String,
    },

    /// Plan and execute tool calls for a task in one batch
    Run {
        /// Task description
        task: String,

        /// Override the configured planning strategy
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Execute suggested tools one at a time until none remain
    Step {
        /// Task description
        task: String,

        /// Override the configured step bound
        #[arg(long, value_name = "N")]
        max_steps: Option<usize>,
    },

    /// Execute a single tool directly
    Call {
        /// Tool name
        tool: String,

        /// Argument as key=value; values that parse as JSON keep their type
        #[arg(short, long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        args: Vec<(String, serde_json::Value)>,

        /// Deadline in milliseconds (defaults to the executor timeout)
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,
    },

    /// List registered tools
    Tools,
}

/// Parse `key=value`, keeping JSON scalars typed and falling back to a string
pub fn parse_key_value(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("path=src/main.rs").unwrap(), ("path".to_string(), json!("src/main.rs")));
        assert_eq!(parse_key_value("limit=10").unwrap(), ("limit".to_string(), json!(10)));
        assert_eq!(parse_key_value("create_dirs=true").unwrap(), ("create_dirs".to_string(), json!(true)));
        assert_eq!(parse_key_value("message=a=b").unwrap(), ("message".to_string(), json!("a=b")));
        assert_eq!(parse_key_value("message=").unwrap(), ("message".to_string(), json!("")));
    }

    #[test]
    fn test_parse_key_value_errors() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_cli_call_command() {
        let cli = Cli::try_parse_from([
            "toolweave",
            "call",
            "read_file",
            "--arg",
            "path=README.md",
            "-a",
            "limit=5",
            "--timeout-ms",
            "200",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Call { tool, args, timeout_ms }) => {
                assert_eq!(tool, "read_file");
                assert_eq!(args.len(), 2);
                assert_eq!(args[1], ("limit".to_string(), json!(5)));
                assert_eq!(timeout_ms, Some(200));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["toolweave", "plan", "read a.txt", "-vv", "--output", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.command, Some(Command::Plan { task: "read a.txt".to_string() }));
    }

    #[test]
    fn test_run_strategy_override() {
        let cli = Cli::try_parse_from(["toolweave", "run", "--strategy", "rules", "search for TODO"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Run {
                task: "search for TODO".to_string(),
                strategy: Some(StrategyArg::Rules),
            })
        );
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
