//! Application-level configuration.
//!
//! - [`ExecutorConfig`]: retry budget, delay and timeout for tool execution
//! - [`AgentParams`]: trigger phrase, planning strategy and loop bound

pub mod execution_params;

pub use execution_params::{
    AgentParams, AgentStrategy, DEFAULT_EXECUTOR_CONFIG, ExecutorConfig, ExecutorConfigOverrides,
};
