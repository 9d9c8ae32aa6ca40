//! Command execution tool: run_command

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use toolweave_domain::tool::{
    ParameterType, Tool, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};
use tracing::debug;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Used when the context carries no deadline
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

pub struct RunCommandTool {
    definition: ToolDefinition,
}

impl RunCommandTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                RUN_COMMAND,
                "Execute a shell command and return its output. Use with caution.",
            )
            .with_parameter(ToolParameter::new("command", "The command to execute", true))
            .with_parameter(ToolParameter::new(
                "working_dir",
                "Working directory for the command",
                false,
            ))
            .with_parameter(
                ToolParameter::new("timeout_secs", "Timeout in seconds", false)
                    .with_type(ParameterType::Number),
            ),
        }
    }
}

impl Default for RunCommandTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let start = Instant::now();
        let command_str = ctx.require_string("command").map_err(ToolError::invalid_argument)?;

        let dir = match ctx.get_string("working_dir") {
            Some(d) => ctx.resolve_path(d),
            None => ctx.working_directory.clone(),
        };
        if !dir.is_dir() {
            return Ok(ToolResult::failure(ToolError::not_found(format!(
                "Working directory does not exist: {}",
                dir.display()
            ))));
        }

        // An explicit argument wins over the executor-supplied deadline
        let timeout = ctx
            .get_i64("timeout_secs")
            .filter(|s| *s > 0)
            .map(|s| Duration::from_secs(s as u64))
            .or(ctx.timeout)
            .unwrap_or(DEFAULT_TIMEOUT);

        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command_str]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command_str]);
            c
        };
        cmd.current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| ToolError::execution_failed(format!("Failed to spawn command: {}", e)))?;

        debug!(command = command_str, dir = %dir.display(), timeout_ms = timeout.as_millis() as u64, "Spawned command");

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(o)) => o,
            Ok(Err(e)) => {
                return Err(ToolError::execution_failed(format!(
                    "Failed to wait for process: {}",
                    e
                )));
            }
            Err(_) => {
                // Dropping the wait future drops the child, which kills it
                return Ok(ToolResult::failure(ToolError::timeout(format!(
                    "Command timed out after {}ms",
                    timeout.as_millis()
                ))));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut combined_output = String::new();
        if !stdout.is_empty() {
            combined_output.push_str(&stdout);
        }
        if !stderr.is_empty() {
            if !combined_output.is_empty() {
                combined_output.push_str("\n--- stderr ---\n");
            }
            combined_output.push_str(&stderr);
        }

        if combined_output.len() > MAX_OUTPUT_SIZE {
            let mut cut = MAX_OUTPUT_SIZE;
            while !combined_output.is_char_boundary(cut) {
                cut -= 1;
            }
            combined_output.truncate(cut);
            combined_output.push_str("\n... (output truncated)");
        }

        let metadata = ToolResultMetadata {
            execution_time_ms: Some(start.elapsed().as_millis() as u64),
            bytes: Some(combined_output.len()),
            exit_code: Some(exit_code),
            ..Default::default()
        };

        // A non-zero exit is still a completed run; the caller reads exit_code
        let data = if output.status.success() {
            combined_output
        } else {
            format!("Command exited with code {}\n{}", exit_code, combined_output)
        };

        Ok(ToolResult::success(data).with_metadata(metadata))
    }
}
