//! Tool Executor port
//!
//! Defines the interface for executing registered tools with retry,
//! a timeout race, and concurrent batches.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use toolweave_domain::tool::{
    entities::{ToolCallRequest, ToolCallResponse, ToolDefinition, ToolParams},
    registry::ToolRegistry,
    value_objects::ToolResult,
};

use crate::config::ExecutorConfig;

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
///
/// None of the execution methods fail: every lookup, validation, execution
/// or timeout failure comes back as a `ToolResult` with `success == false`.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Registry the executor resolves tool names against
    fn registry(&self) -> &ToolRegistry;

    fn config(&self) -> &ExecutorConfig;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.registry().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.registry().definition(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.registry().names().collect()
    }

    /// Validate, then execute with the retry budget
    async fn execute(
        &self,
        name: &str,
        params: ToolParams,
        working_dir: Option<PathBuf>,
    ) -> ToolResult;

    /// Race `execute` against `timeout`; the first to settle wins
    async fn execute_with_timeout(
        &self,
        name: &str,
        params: ToolParams,
        timeout: Duration,
        working_dir: Option<PathBuf>,
    ) -> ToolResult;

    /// Execute all requests concurrently; responses keep input order
    async fn execute_batch(&self, requests: &[ToolCallRequest]) -> Vec<ToolCallResponse>;
}
