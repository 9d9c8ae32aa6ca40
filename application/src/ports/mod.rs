//! Port definitions implemented by the infrastructure layer.

pub mod tool_executor;

pub use tool_executor::ToolExecutorPort;
