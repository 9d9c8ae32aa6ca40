//! Application use cases.
//!
//! - [`tool_planner`]: keyword-driven task decomposition
//! - [`run_tool_agent`]: plan → execute batch → summarize

pub mod run_tool_agent;
pub mod tool_planner;
