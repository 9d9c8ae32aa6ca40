//! Application layer for toolweave
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{
    AgentParams, AgentStrategy, DEFAULT_EXECUTOR_CONFIG, ExecutorConfig, ExecutorConfigOverrides,
};
pub use ports::tool_executor::ToolExecutorPort;
pub use use_cases::run_tool_agent::{
    AgentError, AgentRunOutcome, PlannerBackedCallPlanner, StepwiseOutcome, StopReason,
    ToolCallPlanner, ToolCallingAgent, TriggerPhrasePlanner,
};
pub use use_cases::tool_planner::{PlanningError, ToolPlanner};
