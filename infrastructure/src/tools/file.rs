//! File operation tools: read_file, write_file
//!
//! Missing files and permission problems are reported as failed results and
//! are not retried; any other I/O error is returned as `Err` so the executor
//! retries it.

use async_trait::async_trait;
use std::io;
use std::time::Instant;
use toolweave_domain::tool::{
    ParameterType, Tool, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub struct ReadFileTool {
    definition: ToolDefinition,
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(READ_FILE, "Read the contents of a file at the specified path")
                .with_parameter(ToolParameter::new("path", "Path to the file to read", true))
                .with_parameter(
                    ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
                        .with_type(ParameterType::Number),
                )
                .with_parameter(
                    ToolParameter::new("limit", "Maximum number of lines to read", false)
                        .with_type(ParameterType::Number),
                ),
        }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let start = Instant::now();
        let path_str = ctx.require_string("path").map_err(ToolError::invalid_argument)?;
        let path = ctx.resolve_path(path_str);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) => return classify_io_error(e, path_str, "Failed to get file metadata"),
        };

        if !metadata.is_file() {
            return Ok(ToolResult::failure(ToolError::invalid_argument(format!(
                "'{}' is not a file",
                path_str
            ))));
        }

        if metadata.len() > MAX_READ_SIZE {
            return Ok(ToolResult::failure(ToolError::invalid_argument(format!(
                "File too large ({} bytes). Maximum size is {} bytes",
                metadata.len(),
                MAX_READ_SIZE
            ))));
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => return classify_io_error(e, path_str, "Failed to read file"),
        };

        let offset = ctx.get_i64("offset").unwrap_or(0).max(0) as usize;
        let limit = ctx.get_i64("limit").map(|l| l.max(0) as usize);

        let output = if offset > 0 || limit.is_some() {
            let lines: Vec<&str> = content.lines().collect();
            let end = limit
                .map(|l| offset.saturating_add(l))
                .unwrap_or(lines.len())
                .min(lines.len());
            if offset >= end {
                String::new()
            } else {
                lines[offset..end].join("\n")
            }
        } else {
            content
        };

        let bytes = output.len();
        Ok(ToolResult::success(output).with_metadata(ToolResultMetadata {
            execution_time_ms: Some(start.elapsed().as_millis() as u64),
            bytes: Some(bytes),
            path: Some(path_str.to_string()),
            ..Default::default()
        }))
    }
}

pub struct WriteFileTool {
    definition: ToolDefinition,
}

impl WriteFileTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                WRITE_FILE,
                "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does.",
            )
            .with_parameter(ToolParameter::new("path", "Path to the file to write", true))
            .with_parameter(ToolParameter::new("content", "Content to write to the file", true))
            .with_parameter(
                ToolParameter::new("create_dirs", "Create parent directories if they don't exist", false)
                    .with_type(ParameterType::Boolean)
                    .with_default(false),
            ),
        }
    }
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let start = Instant::now();
        let path_str = ctx.require_string("path").map_err(ToolError::invalid_argument)?;
        let content = ctx.require_string("content").map_err(ToolError::invalid_argument)?;
        let path = ctx.resolve_path(path_str);

        if ctx.get_bool("create_dirs").unwrap_or(false)
            && let Some(parent) = path.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return classify_io_error(e, path_str, "Failed to create parent directories");
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !tokio::fs::try_exists(parent).await.unwrap_or(false)
        {
            return Ok(ToolResult::failure(ToolError::not_found(format!(
                "Parent directory does not exist: {}",
                parent.display()
            ))));
        }

        let bytes = content.len();
        if let Err(e) = tokio::fs::write(&path, content).await {
            return classify_io_error(e, path_str, "Failed to write file");
        }

        Ok(
            ToolResult::success(format!("Successfully wrote {} bytes to {}", bytes, path_str))
                .with_metadata(ToolResultMetadata {
                    execution_time_ms: Some(start.elapsed().as_millis() as u64),
                    bytes: Some(bytes),
                    path: Some(path_str.to_string()),
                    ..Default::default()
                }),
        )
    }
}

/// Permanent I/O failures become failed results; the rest are retryable.
fn classify_io_error(e: io::Error, path: &str, context: &str) -> Result<ToolResult, ToolError> {
    match e.kind() {
        io::ErrorKind::NotFound => Ok(ToolResult::failure(ToolError::not_found(path))),
        io::ErrorKind::PermissionDenied => {
            Ok(ToolResult::failure(ToolError::permission_denied(path)))
        }
        _ => Err(ToolError::execution_failed(format!("{}: {}", context, e))),
    }
}
