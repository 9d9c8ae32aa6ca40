//! Call planning strategies for the tool-calling agent.
//!
//! [`ToolCallPlanner`] is the seam: the agent loop and the executor stay the
//! same whichever strategy turns a task into calls.

use std::sync::Arc;
use toolweave_domain::planning::find_keyword;
use toolweave_domain::{ToolCallPlan, ToolCallRequest};

use crate::config::AgentParams;
use crate::use_cases::tool_planner::{PlanningError, ToolPlanner};

/// Strategy turning a task into a batch of tool calls
pub trait ToolCallPlanner: Send + Sync {
    fn plan_tool_calls(&self, task: &str) -> Result<ToolCallPlan, PlanningError>;
}

/// Recognizes one trigger phrase and emits exactly one call, passing the
/// text after the phrase as a single argument.
#[derive(Debug, Clone)]
pub struct TriggerPhrasePlanner {
    phrase: String,
    tool: String,
    argument: String,
}

impl TriggerPhrasePlanner {
    pub fn new(
        phrase: impl Into<String>,
        tool: impl Into<String>,
        argument: impl Into<String>,
    ) -> Self {
        Self {
            phrase: phrase.into(),
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    pub fn from_params(params: &AgentParams) -> Self {
        Self::new(
            params.trigger_phrase.clone(),
            params.trigger_tool.clone(),
            params.trigger_argument.clone(),
        )
    }
}

impl ToolCallPlanner for TriggerPhrasePlanner {
    fn plan_tool_calls(&self, task: &str) -> Result<ToolCallPlan, PlanningError> {
        let Some((_, end)) = find_keyword(task, &self.phrase) else {
            return Ok(ToolCallPlan::new(format!(
                "No '{}' trigger phrase in task",
                self.phrase
            )));
        };

        let rest = task[end..].trim_start_matches([':', ' ', '\t']).trim();
        let call = ToolCallRequest::new(self.tool.clone()).with_arg(self.argument.clone(), rest);

        Ok(ToolCallPlan::new(format!(
            "Task contains trigger phrase '{}'; calling {}",
            self.phrase, self.tool
        ))
        .with_call(call))
    }
}

/// Uses the rule-based planner and rejects plans that fail validation.
pub struct PlannerBackedCallPlanner {
    planner: Arc<ToolPlanner>,
}

impl PlannerBackedCallPlanner {
    pub fn new(planner: Arc<ToolPlanner>) -> Self {
        Self { planner }
    }
}

impl ToolCallPlanner for PlannerBackedCallPlanner {
    fn plan_tool_calls(&self, task: &str) -> Result<ToolCallPlan, PlanningError> {
        let plan = self.planner.create_plan(task);
        let report = self.planner.validate_plan(&plan);
        if !report.valid {
            return Err(PlanningError::InvalidPlan(report.errors));
        }

        let reasoning = plan
            .iter()
            .map(|step| step.reason.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Ok(plan.steps.into_iter().fold(
            ToolCallPlan::new(reasoning),
            |acc, step| {
                acc.with_call(ToolCallRequest::new(step.tool).with_arguments(step.parameters))
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use toolweave_domain::tool::{
        Tool, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolRegistry, ToolResult,
    };

    #[test]
    fn test_trigger_phrase_emits_one_call() {
        let planner = TriggerPhrasePlanner::from_params(&AgentParams::default());
        let plan = planner.plan_tool_calls("please echo: hello world").unwrap();

        assert_eq!(plan.calls.len(), 1);
        assert_eq!(plan.calls[0].name, "echo");
        assert_eq!(plan.calls[0].arguments["message"], "hello world");
        assert!(!plan.reasoning.is_empty());
    }

    #[test]
    fn test_trigger_phrase_absent_yields_empty_plan() {
        let planner = TriggerPhrasePlanner::new("echo", "echo", "message");
        let plan = planner.plan_tool_calls("read config.json").unwrap();
        assert!(plan.is_empty());
        assert!(plan.reasoning.contains("echo"));
    }

    struct PathTool(ToolDefinition);

    #[async_trait]
    impl Tool for PathTool {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        async fn execute(&self, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success(""))
        }
    }

    fn rules_planner() -> PlannerBackedCallPlanner {
        let registry = ToolRegistry::new().register(PathTool(
            ToolDefinition::new("read_file", "Read a file")
                .with_parameter(ToolParameter::new("path", "Path", true)),
        ));
        let planner = ToolPlanner::with_default_policy(Arc::new(registry)).unwrap();
        PlannerBackedCallPlanner::new(Arc::new(planner))
    }

    #[test]
    fn test_planner_backed_converts_steps() {
        let plan = rules_planner().plan_tool_calls("read notes.txt").unwrap();
        assert_eq!(plan.calls.len(), 1);
        assert_eq!(plan.calls[0].name, "read_file");
        assert_eq!(plan.calls[0].arguments["path"], "notes.txt");
        assert!(plan.calls[0].id.starts_with("call_"));
    }

    #[test]
    fn test_planner_backed_rejects_invalid_plan() {
        let err = rules_planner().plan_tool_calls("read something").unwrap_err();
        match err {
            PlanningError::InvalidPlan(errors) => assert!(errors[0].contains("path")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
