//! Domain layer for toolweave
//!
//! This crate contains the tool model and the planning vocabulary.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool
//!
//! A named capability with a declared parameter schema. Tools live in a
//! [`ToolRegistry`] built once at startup and shared read-only.
//!
//! ## Plan
//!
//! An ordered list of [`PlanStep`]s produced from a natural-language task by
//! keyword heuristics. All language-specific data sits in
//! [`DecompositionPolicy`].

pub mod planning;
pub mod tool;

pub use planning::{
    CompletedStep, DecompositionPolicy, ExecutionContext, Locale, LocaleKeywords, ObjectPosition,
    PlanStep, SuggestionRule, TaskCategory, ToolCandidate, ToolPlan, ToolSelection,
};
pub use tool::{
    ErrorKind, ParameterType, PresenceValidator, SchemaValidator, Tool, ToolCallPlan,
    ToolCallRequest, ToolCallResponse, ToolContext, ToolDefinition, ToolError, ToolParameter,
    ToolParams, ToolRegistry, ToolResult, ToolResultMetadata, ToolValidator, ValidationReport,
};
