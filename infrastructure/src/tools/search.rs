//! Content search tool: search_files
//!
//! Regex search over a file or a directory tree, optionally narrowed by a
//! glob. The walk and the reads are blocking, so they run on the blocking
//! pool.

use async_trait::async_trait;
use glob::{Pattern, glob};
use regex::RegexBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use toolweave_domain::tool::{
    ParameterType, Tool, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};

/// Tool name constant
pub const SEARCH_FILES: &str = "search_files";

/// Maximum number of matching lines to return
const MAX_RESULTS: usize = 1000;

/// Files larger than this are skipped (5 MB)
const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub struct SearchFilesTool {
    definition: ToolDefinition,
}

impl SearchFilesTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                SEARCH_FILES,
                "Search for a regex pattern within file contents",
            )
            .with_parameter(ToolParameter::new("query", "Regex pattern to search for", true))
            .with_parameter(
                ToolParameter::new("path", "File or directory to search in", false)
                    .with_default("."),
            )
            .with_parameter(ToolParameter::new(
                "file_pattern",
                "Glob pattern to filter files (e.g., '*.rs')",
                false,
            ))
            .with_parameter(
                ToolParameter::new("case_insensitive", "Perform case-insensitive search", false)
                    .with_type(ParameterType::Boolean),
            ),
        }
    }
}

impl Default for SearchFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SearchFilesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let start = Instant::now();
        let query = ctx.require_string("query").map_err(ToolError::invalid_argument)?;
        let path_str = ctx.get_string("path").unwrap_or(".").to_string();
        let root = ctx.resolve_path(&path_str);

        let regex = match RegexBuilder::new(query)
            .case_insensitive(ctx.get_bool("case_insensitive").unwrap_or(false))
            .build()
        {
            Ok(r) => r,
            Err(e) => {
                return Ok(ToolResult::failure(ToolError::invalid_argument(format!(
                    "Invalid regex pattern: {}",
                    e
                ))));
            }
        };

        if !root.exists() {
            return Ok(ToolResult::failure(ToolError::not_found(path_str)));
        }

        let file_pattern = ctx.get_string("file_pattern").map(str::to_string);
        let search_root = root.clone();
        let (lines, match_count) = tokio::task::spawn_blocking(move || {
            let files = if search_root.is_file() {
                vec![search_root.clone()]
            } else {
                collect_files(&search_root, file_pattern.as_deref())
            };
            grep_files(&search_root, &files, &regex)
        })
        .await
        .map_err(|e| ToolError::execution_failed(format!("Search task failed: {}", e)))?;

        let mut output = if lines.is_empty() {
            "No matches found".to_string()
        } else {
            lines.join("\n")
        };
        if match_count > MAX_RESULTS {
            output.push_str(&format!("\n... (limited to {} matches)", MAX_RESULTS));
        }

        Ok(ToolResult::success(output).with_metadata(ToolResultMetadata {
            execution_time_ms: Some(start.elapsed().as_millis() as u64),
            match_count: Some(match_count),
            path: Some(path_str),
            ..Default::default()
        }))
    }
}

/// Collect files under `dir`, optionally filtered by a glob.
///
/// A pattern without a separator matches at any depth.
fn collect_files(dir: &Path, file_pattern: Option<&str>) -> Vec<PathBuf> {
    let pattern = match file_pattern {
        Some(p) if p.contains('/') => p.to_string(),
        Some(p) => format!("**/{}", p),
        None => "**/*".to_string(),
    };
    // The root is literal; only the file pattern is glob syntax
    let full_pattern = format!("{}/{}", Pattern::escape(&dir.display().to_string()), pattern);

    let mut files: Vec<PathBuf> = glob(&full_pattern)
        .map(|paths| paths.flatten().filter(|p| p.is_file()).collect())
        .unwrap_or_default();
    files.sort();
    files
}

/// Matching lines as `file:line: text`, plus the total match count
fn grep_files(root: &Path, files: &[PathBuf], regex: &regex::Regex) -> (Vec<String>, usize) {
    let mut results = Vec::new();
    let mut total = 0;

    for file in files {
        if fs::metadata(file).map(|m| m.len() > MAX_FILE_SIZE).unwrap_or(true) {
            continue;
        }
        let Ok(content) = fs::read_to_string(file) else {
            continue;
        };
        let display = file
            .strip_prefix(root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(file.as_path())
            .display()
            .to_string();

        for (index, line) in content.lines().enumerate() {
            if regex.is_match(line) {
                total += 1;
                if results.len() < MAX_RESULTS {
                    results.push(format!("{}:{}: {}", display, index + 1, line));
                }
            }
        }
    }

    (results, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use toolweave_domain::tool::{ErrorKind, ToolParams};

    fn ctx(params: serde_json::Value, dir: &Path) -> ToolContext {
        let params: ToolParams = serde_json::from_value(params).unwrap();
        ToolContext::new(params, dir)
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "fn main() {\n    // TODO: wire up\n}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "todo list\nTODO: buy milk\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_search_directory() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "TODO"}), dir.path()))
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.metadata.match_count, Some(2));
        let output = result.text().unwrap();
        assert!(output.contains("src/main.rs:2:"));
        assert!(output.contains("notes.txt:2:"));
    }

    #[tokio::test]
    async fn test_search_with_file_pattern() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "TODO", "file_pattern": "*.rs"}), dir.path()))
            .await
            .unwrap();

        assert_eq!(result.metadata.match_count, Some(1));
        assert!(!result.text().unwrap().contains("notes.txt"));
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(
                json!({"query": "todo", "path": "notes.txt", "case_insensitive": true}),
                dir.path(),
            ))
            .await
            .unwrap();

        assert_eq!(result.metadata.match_count, Some(2));
    }

    #[tokio::test]
    async fn test_search_root_with_glob_metacharacters() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("build [v1] *");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("log.txt"), "TODO: ship\n").unwrap();

        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "TODO"}), &root))
            .await
            .unwrap();

        assert_eq!(result.metadata.match_count, Some(1));
        assert!(result.text().unwrap().contains("log.txt:1:"));
    }

    #[tokio::test]
    async fn test_search_no_matches() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "nothing-here"}), dir.path()))
            .await
            .unwrap();

        assert_eq!(result.text(), Some("No matches found"));
        assert_eq!(result.metadata.match_count, Some(0));
    }

    #[tokio::test]
    async fn test_search_invalid_regex() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "(unclosed"}), dir.path()))
            .await
            .unwrap();

        assert_eq!(result.error().unwrap().kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_search_missing_path() {
        let dir = fixture();
        let result = SearchFilesTool::new()
            .execute(&ctx(json!({"query": "x", "path": "missing"}), dir.path()))
            .await
            .unwrap();

        assert_eq!(result.error().unwrap().kind, ErrorKind::NotFound);
    }
}
