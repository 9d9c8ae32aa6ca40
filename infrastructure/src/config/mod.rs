//! Configuration file loading for toolweave
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLWEAVE_*` environment variables, e.g. `TOOLWEAVE_EXECUTOR__MAX_RETRIES=0`
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolweave.toml` or `./.toolweave.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/toolweave/config.toml`
//! 5. Default values

mod file_config;
mod issue;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileExecutorConfig, FilePlannerConfig, FileToolsConfig,
    ResolvedConfig,
};
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::{ConfigError, ConfigLoader};
