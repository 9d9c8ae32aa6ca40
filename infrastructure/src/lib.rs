//! Infrastructure layer for toolweave
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the built-in tools, the local executor
//! and configuration file loading.

pub mod config;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigIssueCode, ConfigLoader, FileAgentConfig, FileConfig,
    FileExecutorConfig, FilePlannerConfig, FileToolsConfig, ResolvedConfig, Severity,
};
pub use tools::{
    BUILTIN_TOOL_NAMES, EchoTool, LocalToolExecutor, ReadFileTool, RunCommandTool,
    SearchFilesTool, WriteFileTool, default_tool_registry, tool_registry_with,
};
