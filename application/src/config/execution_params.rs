//! Execution parameters for the executor and the agent loop.
//!
//! [`ExecutorConfig`] is fixed per executor instance: it is built from
//! [`DEFAULT_EXECUTOR_CONFIG`] merged field-by-field with
//! [`ExecutorConfigOverrides`]. There is no global mutable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry and timeout settings for a tool executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Deadline used by `execute_with_timeout` callers that have no
    /// timeout of their own, and the soft deadline handed to tools.
    pub timeout: Duration,
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Fixed delay between attempts (no backoff, no jitter)
    pub retry_delay: Duration,
    /// Abort the in-flight execution when a timeout race is lost.
    /// Off by default: the losing execution runs to completion unobserved.
    pub abort_on_timeout: bool,
}

pub const DEFAULT_EXECUTOR_CONFIG: ExecutorConfig = ExecutorConfig {
    timeout: Duration::from_millis(30_000),
    max_retries: 3,
    retry_delay: Duration::from_millis(1_000),
    abort_on_timeout: false,
};

impl Default for ExecutorConfig {
    fn default() -> Self {
        DEFAULT_EXECUTOR_CONFIG
    }
}

/// Partial executor configuration; `None` keeps the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfigOverrides {
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
    pub abort_on_timeout: Option<bool>,
}

impl ExecutorConfig {
    /// Merge overrides over [`DEFAULT_EXECUTOR_CONFIG`]
    pub fn from_overrides(overrides: ExecutorConfigOverrides) -> Self {
        DEFAULT_EXECUTOR_CONFIG.merge(overrides)
    }

    pub fn merge(self, overrides: ExecutorConfigOverrides) -> Self {
        Self {
            timeout: overrides.timeout.unwrap_or(self.timeout),
            max_retries: overrides.max_retries.unwrap_or(self.max_retries),
            retry_delay: overrides.retry_delay.unwrap_or(self.retry_delay),
            abort_on_timeout: overrides.abort_on_timeout.unwrap_or(self.abort_on_timeout),
        }
    }

    /// Total attempts a single `execute` call may make
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    // ==================== Builder Methods ====================

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_abort_on_timeout(mut self, abort: bool) -> Self {
        self.abort_on_timeout = abort;
        self
    }
}

/// How the agent turns a task into tool calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStrategy {
    /// Single trigger phrase, one call
    #[default]
    Trigger,
    /// Rule-based planner output, validated before execution
    Rules,
}

impl AgentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStrategy::Trigger => "trigger",
            AgentStrategy::Rules => "rules",
        }
    }
}

impl std::fmt::Display for AgentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trigger" => Ok(AgentStrategy::Trigger),
            "rules" | "planner" => Ok(AgentStrategy::Rules),
            other => Err(format!("Unknown agent strategy: {}", other)),
        }
    }
}

/// Tool-calling agent parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentParams {
    /// Phrase recognized by the trigger strategy
    pub trigger_phrase: String,
    /// Tool the trigger phrase dispatches to
    pub trigger_tool: String,
    /// Argument receiving the text after the trigger phrase
    pub trigger_argument: String,
    pub strategy: AgentStrategy,
    /// Upper bound on iterations of `run_stepwise`
    pub max_steps: usize,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            trigger_phrase: "echo".to_string(),
            trigger_tool: "echo".to_string(),
            trigger_argument: "message".to_string(),
            strategy: AgentStrategy::Trigger,
            max_steps: 10,
        }
    }
}

impl AgentParams {
    pub fn with_trigger(mut self, phrase: impl Into<String>, tool: impl Into<String>) -> Self {
        self.trigger_phrase = phrase.into();
        self.trigger_tool = tool.into();
        self
    }

    pub fn with_strategy(mut self, strategy: AgentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }
}
