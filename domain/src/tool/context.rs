//! Per-attempt execution context handed to a [`Tool`](super::traits::Tool).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::entities::ToolParams;

/// Context for a single execution attempt.
///
/// The executor builds a fresh context for every attempt; a context is never
/// shared between attempts or between concurrent calls.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub params: ToolParams,
    /// Directory relative paths are resolved against
    pub working_directory: PathBuf,
    /// Soft deadline a tool may honour for its own blocking work
    pub timeout: Option<Duration>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolContext {
    pub fn new(params: ToolParams, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            params,
            working_directory: working_directory.into(),
            timeout: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string parameter or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.params.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(|v| v.as_bool())
    }

    /// Resolve a possibly relative path against the working directory
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.working_directory.join(candidate)
        }
    }
}
