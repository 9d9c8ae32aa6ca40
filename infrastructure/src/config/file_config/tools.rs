//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! working_dir = "~/projects/site"
//! enabled = ["read_file", "search_files"]
//! ```
//!
//! An empty `enabled` list registers every built-in tool.

use crate::config::issue::ConfigIssue;
use crate::tools::BUILTIN_TOOL_NAMES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Default working directory for tool calls
    pub working_dir: Option<String>,
    /// Built-in tools to register
    pub enabled: Vec<String>,
}

impl FileToolsConfig {
    /// Enabled tool names with unknown entries dropped
    pub fn parse_enabled(&self) -> (Vec<String>, Vec<ConfigIssue>) {
        let mut enabled = Vec::new();
        let mut issues = Vec::new();

        for name in &self.enabled {
            if BUILTIN_TOOL_NAMES.contains(&name.as_str()) {
                if !enabled.contains(name) {
                    enabled.push(name.clone());
                }
            } else {
                issues.push(ConfigIssue::unknown_tool("tools.enabled", name));
            }
        }

        (enabled, issues)
    }

    /// The configured working directory with a leading `~` expanded
    pub fn working_dir_path(&self) -> Option<PathBuf> {
        let raw = self.working_dir.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if raw == "~" {
            return dirs::home_dir();
        }
        if let Some(rest) = raw.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return Some(home.join(rest));
        }
        Some(PathBuf::from(raw))
    }
}
