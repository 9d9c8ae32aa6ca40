//! Output formatter trait

use toolweave_application::{AgentRunOutcome, StepwiseOutcome};
use toolweave_domain::{ToolDefinition, ToolPlan, ToolResult, ToolSelection, ValidationReport};

/// Trait for rendering command results
pub trait OutputFormatter {
    /// A plan together with its validation report
    fn format_plan(&self, plan: &ToolPlan, report: &ValidationReport) -> String;

    /// Ranked tool candidates
    fn format_selection(&self, selection: &ToolSelection) -> String;

    /// Outcome of a batch agent run
    fn format_run(&self, outcome: &AgentRunOutcome) -> String;

    /// Outcome of a stepwise agent run
    fn format_stepwise(&self, outcome: &StepwiseOutcome) -> String;

    /// Result of a single direct tool call
    fn format_result(&self, tool: &str, result: &ToolResult) -> String;

    /// Registered tool definitions
    fn format_tools(&self, tools: &[&ToolDefinition]) -> String;
}
