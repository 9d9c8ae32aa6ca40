//! Echo tool: returns its message unchanged

use async_trait::async_trait;
use toolweave_domain::tool::{Tool, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolResult};

pub const ECHO: &str = "echo";

pub struct EchoTool {
    definition: ToolDefinition,
}

impl EchoTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(ECHO, "Echo back the given message")
                .with_parameter(ToolParameter::new("message", "Message to echo back", true)),
        }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let message = ctx.require_string("message").map_err(ToolError::invalid_argument)?;
        Ok(ToolResult::success(message))
    }
}
