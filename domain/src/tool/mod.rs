//! Tool domain module
//!
//! Core abstractions of the tool system: what a tool is, how it is invoked,
//! and what comes back.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolContext  │───▶│ ToolResult   │
//! │ (Arc<Tool>)  │    │ (per attempt)│    │ (uniform)    │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Tool`]: capability trait: definition, `execute`, `validate_parameters`
//! - [`ToolDefinition`] / [`ToolParameter`]: declared schema (recursive)
//! - [`ToolRegistry`]: read-only lookup populated once at startup
//! - [`ToolContext`]: fresh per execution attempt
//! - [`ToolResult`]: every outcome, success or failure
//! - [`ToolCallRequest`] / [`ToolCallResponse`]: correlation-id keyed batch items
//!
//! # Architecture
//!
//! - **Domain** (this module): definitions and pure validation, no I/O
//! - **Application** (`ToolExecutorPort`): port for execution
//! - **Infrastructure** (`LocalToolExecutor`): retry, timeout race, batching,
//!   and the concrete file/search/command/echo tools

pub mod context;
pub mod entities;
pub mod registry;
pub mod traits;
pub mod value_objects;

pub use context::ToolContext;
pub use entities::{
    ParameterType, ToolCallPlan, ToolCallRequest, ToolCallResponse, ToolDefinition, ToolParameter,
    ToolParams,
};
pub use registry::ToolRegistry;
pub use traits::{PresenceValidator, SchemaValidator, Tool, ToolValidator, ValidationReport};
pub use value_objects::{ErrorKind, ToolError, ToolResult, ToolResultMetadata};
