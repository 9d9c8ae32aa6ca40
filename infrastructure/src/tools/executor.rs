//! Local tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] resolves names against a shared [`ToolRegistry`]
//! and runs tools in-process with validation, a fixed-delay retry loop, a
//! timeout race, and unbounded concurrent batches.
//!
//! # Execution Paths
//!
//! ```text
//! execute()
//!   ├─ unknown tool        → failure, attempts = 0
//!   ├─ invalid parameters  → failure, attempts = 0
//!   └─ attempt loop (max_retries + 1)
//!        ├─ Ok(result)     → result + {execution_time, attempts}
//!        └─ Err / panic    → sleep(retry_delay), next attempt
//!
//! execute_with_timeout()
//!   spawn(execute) ─┬─ settles first → its result
//!                   └─ deadline first → timeout failure
//!                                       (task keeps running unless
//!                                        abort_on_timeout is set)
//! ```

use async_trait::async_trait;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use toolweave_application::config::ExecutorConfig;
use toolweave_application::ports::tool_executor::ToolExecutorPort;
use toolweave_domain::tool::{
    ToolCallRequest, ToolCallResponse, ToolContext, ToolError, ToolParams, ToolRegistry,
    ToolResult,
};
use tracing::{debug, info, warn};

/// Executor that runs registered tools on the local machine.
///
/// Cheap to clone: the registry is shared behind an `Arc` and never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    /// Used when a call has no working directory of its own
    working_dir: Option<PathBuf>,
}

impl LocalToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            config: ExecutorConfig::default(),
            working_dir: None,
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default working directory for tool calls
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn registry_arc(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    /// Override, else the executor default, else the process cwd
    fn resolve_working_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        override_dir
            .or_else(|| self.working_dir.clone())
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    async fn run_attempts(
        &self,
        name: &str,
        params: ToolParams,
        working_dir: Option<PathBuf>,
    ) -> ToolResult {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Unknown tool");
            return ToolResult::failure(ToolError::unknown_tool(name)).with_attempts(0);
        };

        let report = tool.validate_parameters(&params);
        if !report.valid {
            warn!(tool = %name, errors = ?report.errors, "Parameter validation failed");
            return ToolResult::failure(ToolError::invalid_argument(format!(
                "Invalid parameters for tool '{}': {}",
                name,
                report.errors.join("; ")
            )))
            .with_attempts(0);
        }

        // Captured once so every attempt sees the same directory
        let working_directory = self.resolve_working_dir(working_dir);
        let max_attempts = self.config.max_attempts();
        let started = Instant::now();
        let mut last_error: Option<ToolError> = None;

        for attempt in 1..=max_attempts {
            let ctx = ToolContext::new(params.clone(), working_directory.clone())
                .with_timeout(self.config.timeout)
                .with_metadata("attempt", attempt);

            let attempt_start = Instant::now();
            let task_tool = Arc::clone(&tool);
            // A panicking tool surfaces as a JoinError instead of unwinding
            // through the caller
            let mut attempt_task =
                AbortOnDrop(tokio::spawn(async move { task_tool.execute(&ctx).await }));
            let outcome = (&mut attempt_task.0)
                .await
                .unwrap_or_else(|e| {
                    Err(ToolError::execution_failed(format!(
                        "Tool '{}' panicked: {}",
                        name, e
                    )))
                });
            let elapsed_ms = attempt_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(result) => {
                    debug!(tool = %name, attempt, elapsed_ms, success = result.success, "Tool attempt returned");
                    return result
                        .with_execution_time(elapsed_ms)
                        .with_attempts(attempt);
                }
                Err(e) => {
                    warn!(tool = %name, attempt, max_attempts, elapsed_ms, error = %e, "Tool attempt failed");
                    last_error = Some(e);
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| ToolError::execution_failed(format!("Tool '{}' failed", name)));
        info!(tool = %name, attempts = max_attempts, "Retry budget exhausted");
        ToolResult::failure(error)
            .with_execution_time(started.elapsed().as_millis() as u64)
            .with_attempts(max_attempts)
    }
}

/// Aborts the wrapped task if dropped before it finishes, so cancelling an
/// `execute` future also cancels the tool attempt it is waiting on.
struct AbortOnDrop<T>(tokio::task::JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    async fn execute(
        &self,
        name: &str,
        params: ToolParams,
        working_dir: Option<PathBuf>,
    ) -> ToolResult {
        self.run_attempts(name, params, working_dir).await
    }

    async fn execute_with_timeout(
        &self,
        name: &str,
        params: ToolParams,
        timeout: Duration,
        working_dir: Option<PathBuf>,
    ) -> ToolResult {
        let executor = self.clone();
        let owned_name = name.to_string();
        let mut handle = tokio::spawn(async move {
            executor.run_attempts(&owned_name, params, working_dir).await
        });

        match tokio::time::timeout(timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ToolResult::failure(ToolError::execution_failed(format!(
                "Tool '{}' task failed: {}",
                name, e
            ))),
            Err(_) => {
                if self.config.abort_on_timeout {
                    handle.abort();
                    debug!(tool = %name, "Aborted timed-out execution");
                } else {
                    debug!(tool = %name, "Timed-out execution left running");
                }
                warn!(tool = %name, timeout_ms = timeout.as_millis() as u64, "Tool timed out");
                ToolResult::failure(ToolError::timeout(format!(
                    "Tool '{}' timed out after {}ms",
                    name,
                    timeout.as_millis()
                )))
            }
        }
    }

    async fn execute_batch(&self, requests: &[ToolCallRequest]) -> Vec<ToolCallResponse> {
        debug!(count = requests.len(), "Executing batch");
        let futures = requests.iter().map(|request| async move {
            let result = self
                .execute(&request.name, request.arguments.clone(), None)
                .await;
            ToolCallResponse::new(request, result)
        });
        join_all(futures).await
    }
}
