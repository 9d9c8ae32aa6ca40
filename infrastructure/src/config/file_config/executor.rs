//! Executor configuration from TOML (`[executor]` section)

use crate::config::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toolweave_application::{DEFAULT_EXECUTOR_CONFIG, ExecutorConfig};

/// Raw executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Per-call deadline in milliseconds
    pub timeout_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Pause between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Cancel the underlying tool when a deadline passes
    pub abort_on_timeout: bool,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_EXECUTOR_CONFIG.timeout.as_millis() as u64,
            max_retries: DEFAULT_EXECUTOR_CONFIG.max_retries,
            retry_delay_ms: DEFAULT_EXECUTOR_CONFIG.retry_delay.as_millis() as u64,
            abort_on_timeout: DEFAULT_EXECUTOR_CONFIG.abort_on_timeout,
        }
    }
}

impl FileExecutorConfig {
    /// Convert to the application-level config.
    ///
    /// A zero timeout would fail every call, so it is replaced by the default.
    pub fn to_executor_config(&self) -> (ExecutorConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let timeout = if self.timeout_ms == 0 {
            issues.push(ConfigIssue::invalid_value(
                "executor.timeout_ms",
                format!(
                    "must be greater than 0, using {}",
                    DEFAULT_EXECUTOR_CONFIG.timeout.as_millis()
                ),
            ));
            DEFAULT_EXECUTOR_CONFIG.timeout
        } else {
            Duration::from_millis(self.timeout_ms)
        };

        let config = ExecutorConfig::default()
            .with_timeout(timeout)
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_abort_on_timeout(self.abort_on_timeout);

        (config, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        let (config, issues) = FileExecutorConfig::default().to_executor_config();
        assert!(issues.is_empty());
        assert_eq!(config, DEFAULT_EXECUTOR_CONFIG);
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let file = FileExecutorConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        let (config, issues) = file.to_executor_config();
        assert_eq!(config.timeout, DEFAULT_EXECUTOR_CONFIG.timeout);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_deserialize_executor_section() {
        let toml_str = r#"
[executor]
timeout_ms = 500
max_retries = 0
abort_on_timeout = true
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let (executor, _) = config.executor.to_executor_config();
        assert_eq!(executor.timeout, Duration::from_millis(500));
        assert_eq!(executor.max_retries, 0);
        assert_eq!(executor.retry_delay, DEFAULT_EXECUTOR_CONFIG.retry_delay);
        assert!(executor.abort_on_timeout);
    }
}
