//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use serde::Serialize;
use serde_json::json;
use toolweave_application::{AgentRunOutcome, StepwiseOutcome};
use toolweave_domain::{ToolDefinition, ToolPlan, ToolResult, ToolSelection, ValidationReport};

/// Pretty-printed JSON for scripting
pub struct JsonFormatter;

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&self, plan: &ToolPlan, report: &ValidationReport) -> String {
        to_json(&json!({ "plan": plan, "validation": report }))
    }

    fn format_selection(&self, selection: &ToolSelection) -> String {
        to_json(selection)
    }

    fn format_run(&self, outcome: &AgentRunOutcome) -> String {
        to_json(outcome)
    }

    fn format_stepwise(&self, outcome: &StepwiseOutcome) -> String {
        to_json(outcome)
    }

    fn format_result(&self, tool: &str, result: &ToolResult) -> String {
        to_json(&json!({ "tool": tool, "result": result }))
    }

    fn format_tools(&self, tools: &[&ToolDefinition]) -> String {
        to_json(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolweave_domain::{PlanStep, ToolError};

    #[test]
    fn test_plan_json_shape() {
        let plan = ToolPlan::new().with_step(PlanStep::new("read_file", "Read a.txt").with_param("path", "a.txt"));
        let output = JsonFormatter.format_plan(&plan, &ValidationReport::ok());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["plan"]["steps"][0]["tool"], "read_file");
        assert_eq!(value["plan"]["steps"][0]["parameters"]["path"], "a.txt");
        assert_eq!(value["validation"]["valid"], true);
    }

    #[test]
    fn test_result_json_shape() {
        let result = ToolResult::failure(ToolError::timeout("too slow"));
        let output = JsonFormatter.format_result("run_command", &result);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["tool"], "run_command");
        assert_eq!(value["result"]["success"], false);
        assert_eq!(value["result"]["error"]["kind"], "TIMEOUT");
    }
}
