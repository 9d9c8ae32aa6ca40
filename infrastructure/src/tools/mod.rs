//! Tool implementations and the local executor
//!
//! Built-in tools operating on the local file system and shell:
//! - `read_file`, `write_file` ([`file`])
//! - `search_files` ([`search`])
//! - `run_command` ([`command`])
//! - `echo` ([`echo`])

pub mod command;
pub mod echo;
pub mod file;
pub mod search;

mod executor;

pub use command::RunCommandTool;
pub use echo::EchoTool;
pub use executor::LocalToolExecutor;
pub use file::{ReadFileTool, WriteFileTool};
pub use search::SearchFilesTool;

use std::sync::Arc;
use toolweave_domain::tool::{Tool, ToolRegistry};
use tracing::debug;

/// Names of every built-in tool, in registration order
pub const BUILTIN_TOOL_NAMES: [&str; 5] = [
    file::READ_FILE,
    file::WRITE_FILE,
    search::SEARCH_FILES,
    command::RUN_COMMAND,
    echo::ECHO,
];

fn builtin_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ReadFileTool::new()),
        Arc::new(WriteFileTool::new()),
        Arc::new(SearchFilesTool::new()),
        Arc::new(RunCommandTool::new()),
        Arc::new(EchoTool::new()),
    ]
}

/// Registry with every built-in tool
pub fn default_tool_registry() -> ToolRegistry {
    builtin_tools()
        .into_iter()
        .fold(ToolRegistry::new(), |registry, tool| registry.register_arc(tool))
}

/// Registry with only the named built-in tools; unknown names are ignored.
///
/// An empty list means every tool.
pub fn tool_registry_with(enabled: &[String]) -> ToolRegistry {
    if enabled.is_empty() {
        return default_tool_registry();
    }

    let registry = builtin_tools()
        .into_iter()
        .filter(|tool| enabled.iter().any(|name| name == tool.name()))
        .fold(ToolRegistry::new(), |registry, tool| registry.register_arc(tool));
    debug!(tools = ?registry.names().collect::<Vec<_>>(), "Built tool registry");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_builtins() {
        let registry = default_tool_registry();
        assert_eq!(registry.names().collect::<Vec<_>>(), BUILTIN_TOOL_NAMES.to_vec());
    }

    #[test]
    fn test_registry_with_enabled_subset() {
        let registry = tool_registry_with(&["echo".to_string(), "read_file".to_string()]);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["read_file", "echo"]);
    }

    #[test]
    fn test_registry_with_empty_list_is_default() {
        assert_eq!(tool_registry_with(&[]).len(), BUILTIN_TOOL_NAMES.len());
    }
}
