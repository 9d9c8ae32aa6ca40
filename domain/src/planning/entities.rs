//! Planning entities: steps, plans, execution history, tool selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tool::entities::{ToolDefinition, ToolParams};
use crate::tool::value_objects::ToolResult;

/// A single planned tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Name of the tool to invoke
    pub tool: String,
    pub parameters: ToolParams,
    /// Human-readable hints for parameters that could not be resolved
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameter_hints: BTreeMap<String, String>,
    pub reason: String,
}

impl PlanStep {
    pub fn new(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            parameters: ToolParams::new(),
            parameter_hints: BTreeMap::new(),
            reason: reason.into(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_hint(mut self, key: impl Into<String>, hint: impl Into<String>) -> Self {
        self.parameter_hints.insert(key.into(), hint.into());
        self
    }

    pub fn has_hints(&self) -> bool {
        !self.parameter_hints.is_empty()
    }
}

/// Ordered sequence of steps; order is execution order.
///
/// Steps are independent: no dependency analysis is performed between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolPlan {
    pub steps: Vec<PlanStep>,
}

impl ToolPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn push(&mut self, step: PlanStep) {
        self.steps.push(step);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanStep> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.tool.as_str()).collect()
    }
}

/// A step that has been executed, with its outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedStep {
    pub tool: String,
    pub result: ToolResult,
}

/// Partial execution history used to suggest the next step.
///
/// Lives only for the duration of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    pub original_task: String,
    pub completed_steps: Vec<CompletedStep>,
}

impl ExecutionContext {
    pub fn new(original_task: impl Into<String>) -> Self {
        Self {
            original_task: original_task.into(),
            completed_steps: Vec::new(),
        }
    }

    pub fn record(&mut self, tool: impl Into<String>, result: ToolResult) {
        self.completed_steps.push(CompletedStep {
            tool: tool.into(),
            result,
        });
    }

    /// Whether the tool has been run at all, regardless of outcome
    pub fn has_run(&self, tool: &str) -> bool {
        self.completed_steps.iter().any(|s| s.tool == tool)
    }

    /// Most recent successful result of the tool
    pub fn last_success(&self, tool: &str) -> Option<&ToolResult> {
        self.completed_steps
            .iter()
            .rev()
            .find(|s| s.tool == tool && s.result.success)
            .map(|s| &s.result)
    }

    pub fn len(&self) -> usize {
        self.completed_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed_steps.is_empty()
    }
}

/// A tool ranked by keyword overlap with a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCandidate {
    pub definition: ToolDefinition,
    /// Number of distinct keywords that matched
    pub score: usize,
    pub matched_keywords: Vec<String>,
}

/// Candidate tools for a task; never empty for a non-empty registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSelection {
    pub candidates: Vec<ToolCandidate>,
    pub reasoning: String,
    /// False when nothing matched and every tool is returned
    pub matched: bool,
}

impl ToolSelection {
    pub fn top(&self) -> Option<&ToolCandidate> {
        self.candidates.first()
    }

    pub fn names(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|c| c.definition.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;

    #[test]
    fn test_plan_step_builder() {
        let step = PlanStep::new("write_file", "write the result")
            .with_param("path", "out.txt")
            .with_param("content", "")
            .with_hint("content", "Text to write");

        assert_eq!(step.parameters["path"], "out.txt");
        assert!(step.has_hints());
    }

    #[test]
    fn test_plan_step_hints_skipped_when_empty() {
        let step = PlanStep::new("read_file", "read").with_param("path", "a.txt");
        let value = serde_json::to_value(&step).unwrap();
        assert!(value.get("parameter_hints").is_none());
    }

    #[test]
    fn test_tool_plan_order() {
        let plan = ToolPlan::new()
            .with_step(PlanStep::new("read_file", "first"))
            .with_step(PlanStep::new("write_file", "second"));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.tool_names(), vec!["read_file", "write_file"]);
    }

    #[test]
    fn test_execution_context_history() {
        let mut ctx = ExecutionContext::new("read a.txt");
        assert!(ctx.is_empty());

        ctx.record("read_file", ToolResult::failure(ToolError::not_found("a.txt")));
        assert!(ctx.has_run("read_file"));
        assert!(ctx.last_success("read_file").is_none());

        ctx.record("read_file", ToolResult::success("hello"));
        assert_eq!(ctx.last_success("read_file").unwrap().text(), Some("hello"));
        assert_eq!(ctx.len(), 2);
    }
}
