//! Tool-Calling Agent use case.
//!
//! Plan → execute batch → summarize. Planning is delegated to a
//! [`ToolCallPlanner`] strategy and execution to a [`ToolExecutorPort`], so
//! either can be swapped without touching the loop.
//!
//! [`ToolCallingAgent::run`] is a failure boundary: planning errors, and
//! panics while planning or executing, come back as an [`AgentRunOutcome`]
//! with `success == false`.

mod planners;
mod types;

pub use planners::{PlannerBackedCallPlanner, ToolCallPlanner, TriggerPhrasePlanner};
pub use types::{AgentError, AgentRunOutcome, StepwiseOutcome, StopReason};

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use toolweave_domain::{ExecutionContext, ToolCallPlan, ToolCallResponse};
use tracing::{debug, info, warn};

use crate::config::{AgentParams, AgentStrategy};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::tool_planner::{PlanningError, ToolPlanner};

const NO_CALLS_PLANNED: &str = "no calls planned";

pub struct ToolCallingAgent<T: ToolExecutorPort> {
    executor: Arc<T>,
    call_planner: Arc<dyn ToolCallPlanner>,
    step_planner: Option<Arc<ToolPlanner>>,
    params: AgentParams,
}

impl<T: ToolExecutorPort + 'static> ToolCallingAgent<T> {
    /// Agent with the trigger-phrase strategy from `params`
    pub fn new(executor: Arc<T>, params: AgentParams) -> Self {
        Self {
            executor,
            call_planner: Arc::new(TriggerPhrasePlanner::from_params(&params)),
            step_planner: None,
            params,
        }
    }

    /// Agent whose strategy follows `params.strategy`, sharing one planner
    /// between the rules strategy and the stepwise loop.
    pub fn with_planner(executor: Arc<T>, planner: Arc<ToolPlanner>, params: AgentParams) -> Self {
        let call_planner: Arc<dyn ToolCallPlanner> = match params.strategy {
            AgentStrategy::Trigger => Arc::new(TriggerPhrasePlanner::from_params(&params)),
            AgentStrategy::Rules => Arc::new(PlannerBackedCallPlanner::new(Arc::clone(&planner))),
        };
        Self {
            executor,
            call_planner,
            step_planner: Some(planner),
            params,
        }
    }

    pub fn with_call_planner(mut self, call_planner: Arc<dyn ToolCallPlanner>) -> Self {
        self.call_planner = call_planner;
        self
    }

    pub fn with_step_planner(mut self, planner: Arc<ToolPlanner>) -> Self {
        self.step_planner = Some(planner);
        self
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn plan_tool_calls(&self, task: &str) -> Result<ToolCallPlan, PlanningError> {
        self.call_planner.plan_tool_calls(task)
    }

    pub async fn execute_plan(&self, plan: &ToolCallPlan) -> Vec<ToolCallResponse> {
        self.executor.execute_batch(&plan.calls).await
    }

    /// Plan and execute a task in one batch.
    pub async fn run(&self, task: &str) -> AgentRunOutcome {
        let attempt = AssertUnwindSafe(self.run_inner(task)).catch_unwind().await;

        match attempt {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(error = %e, "Agent run failed");
                AgentRunOutcome::failed(e.to_string())
            }
            Err(payload) => {
                let e = AgentError::Panicked(panic_message(payload.as_ref()));
                warn!(error = %e, "Agent run panicked");
                AgentRunOutcome::failed(e.to_string())
            }
        }
    }

    async fn run_inner(&self, task: &str) -> Result<AgentRunOutcome, AgentError> {
        let plan = self.plan_tool_calls(task)?;
        debug!(calls = plan.calls.len(), reasoning = %plan.reasoning, "Planned tool calls");

        if plan.is_empty() {
            return Ok(AgentRunOutcome::failed(NO_CALLS_PLANNED).with_reasoning(plan.reasoning));
        }

        let responses = self.execute_plan(&plan).await;
        let total = responses.len();
        let succeeded = responses.iter().filter(|r| r.result.success).count();
        let summary = format!("Executed {} tool calls, {} succeeded", total, succeeded);
        info!(total, succeeded, "Agent run complete");

        Ok(AgentRunOutcome {
            success: succeeded == total,
            summary: Some(summary),
            error: None,
            reasoning: Some(plan.reasoning),
            responses,
        })
    }

    /// Iterate suggest → execute → record until the planner has nothing
    /// left or `max_steps` is reached. Each step runs under the executor's
    /// configured timeout.
    pub async fn run_stepwise(&self, task: &str) -> StepwiseOutcome {
        let Some(planner) = self.step_planner.as_ref() else {
            return StepwiseOutcome::failed(
                AgentError::InvalidConfig("no step planner configured".to_string()).to_string(),
            );
        };

        let attempt = AssertUnwindSafe(self.stepwise_inner(planner, task))
            .catch_unwind()
            .await;

        attempt.unwrap_or_else(|payload| {
            let e = AgentError::Panicked(panic_message(payload.as_ref()));
            warn!(error = %e, "Stepwise run panicked");
            StepwiseOutcome::failed(e.to_string())
        })
    }

    async fn stepwise_inner(&self, planner: &ToolPlanner, task: &str) -> StepwiseOutcome {
        let timeout = self.executor.config().timeout;
        let mut context = ExecutionContext::new(task);
        let mut stop_reason = StopReason::MaxSteps;

        for step_index in 0..self.params.max_steps {
            let Some(step) = planner.suggest_next_tool(&context) else {
                stop_reason = StopReason::NoMoreSteps;
                break;
            };

            debug!(step = step_index + 1, tool = %step.tool, reason = %step.reason, "Executing step");
            let result = self
                .executor
                .execute_with_timeout(&step.tool, step.parameters.clone(), timeout, None)
                .await;

            if !result.success {
                warn!(
                    tool = %step.tool,
                    error = result.error_message().unwrap_or("unknown error"),
                    "Step failed"
                );
            }
            context.record(step.tool, result);
        }

        let total = context.len();
        let succeeded = context
            .completed_steps
            .iter()
            .filter(|s| s.result.success)
            .count();
        info!(total, succeeded, stop = ?stop_reason, "Stepwise run complete");

        if total == 0 {
            return StepwiseOutcome {
                success: false,
                steps: Vec::new(),
                stop_reason,
                summary: "No steps suggested".to_string(),
                error: Some(NO_CALLS_PLANNED.to_string()),
            };
        }

        StepwiseOutcome {
            success: succeeded == total,
            steps: context.completed_steps,
            stop_reason,
            summary: format!("Executed {} steps, {} succeeded", total, succeeded),
            error: None,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutorConfig;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use toolweave_domain::tool::{
        Tool, ToolCallRequest, ToolContext, ToolDefinition, ToolError, ToolParameter, ToolParams,
        ToolRegistry, ToolResult,
    };

    /// Executor double: answers from the tool's own `execute`, counts calls
    struct FakeExecutor {
        registry: ToolRegistry,
        config: ExecutorConfig,
        calls: AtomicUsize,
    }

    impl FakeExecutor {
        fn new(registry: ToolRegistry) -> Self {
            Self {
                registry,
                config: ExecutorConfig::default(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for FakeExecutor {
        fn registry(&self) -> &ToolRegistry {
            &self.registry
        }

        fn config(&self) -> &ExecutorConfig {
            &self.config
        }

        async fn execute(
            &self,
            name: &str,
            params: ToolParams,
            _working_dir: Option<PathBuf>,
        ) -> ToolResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some(tool) = self.registry.get(name) else {
                return ToolResult::failure(ToolError::unknown_tool(name));
            };
            let ctx = ToolContext::new(params, ".");
            tool.execute(&ctx)
                .await
                .unwrap_or_else(ToolResult::failure)
        }

        async fn execute_with_timeout(
            &self,
            name: &str,
            params: ToolParams,
            _timeout: Duration,
            working_dir: Option<PathBuf>,
        ) -> ToolResult {
            self.execute(name, params, working_dir).await
        }

        async fn execute_batch(&self, requests: &[ToolCallRequest]) -> Vec<ToolCallResponse> {
            let mut responses = Vec::new();
            for request in requests {
                let result = self
                    .execute(&request.name, request.arguments.clone(), None)
                    .await;
                responses.push(ToolCallResponse::new(request, result));
            }
            responses
        }
    }

    struct EchoTool(ToolDefinition);

    impl EchoTool {
        fn new() -> Self {
            Self(
                ToolDefinition::new("echo", "Echo back a message")
                    .with_parameter(ToolParameter::new("message", "Message", true)),
            )
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
            Ok(ToolResult::success(ctx.get_string("message").unwrap_or_default().to_string()))
        }
    }

    struct FileTool {
        definition: ToolDefinition,
        output: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl Tool for FileTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(&self, _ctx: &ToolContext) -> Result<ToolResult, ToolError> {
            match self.output {
                Ok(text) => Ok(ToolResult::success(text)),
                Err(msg) => Ok(ToolResult::failure(ToolError::not_found(msg))),
            }
        }
    }

    fn file_registry(read_output: Result<&'static str, &'static str>) -> ToolRegistry {
        ToolRegistry::new()
            .register(FileTool {
                definition: ToolDefinition::new("read_file", "Read a file")
                    .with_parameter(ToolParameter::new("path", "Path", true)),
                output: read_output,
            })
            .register(FileTool {
                definition: ToolDefinition::new("write_file", "Write a file")
                    .with_parameter(ToolParameter::new("path", "Path", true))
                    .with_parameter(ToolParameter::new("content", "Content", true)),
                output: Ok("written"),
            })
    }

    struct PanickingPlanner;

    impl ToolCallPlanner for PanickingPlanner {
        fn plan_tool_calls(&self, _task: &str) -> Result<ToolCallPlan, PlanningError> {
            panic!("planner exploded");
        }
    }

    struct FailingPlanner;

    impl ToolCallPlanner for FailingPlanner {
        fn plan_tool_calls(&self, _task: &str) -> Result<ToolCallPlan, PlanningError> {
            Err(PlanningError::Failed("no idea".to_string()))
        }
    }

    fn echo_agent() -> (Arc<FakeExecutor>, ToolCallingAgent<FakeExecutor>) {
        let executor = Arc::new(FakeExecutor::new(ToolRegistry::new().register(EchoTool::new())));
        let agent = ToolCallingAgent::new(Arc::clone(&executor), AgentParams::default());
        (executor, agent)
    }

    #[tokio::test]
    async fn test_run_trigger_phrase() {
        let (_, agent) = echo_agent();
        let outcome = agent.run("echo hello").await;

        assert!(outcome.success);
        assert_eq!(outcome.summary.as_deref(), Some("Executed 1 tool calls, 1 succeeded"));
        assert_eq!(outcome.responses[0].result.text(), Some("hello"));
    }

    #[tokio::test]
    async fn test_run_no_calls_never_touches_executor() {
        let (executor, agent) = echo_agent();
        let outcome = agent.run("nothing to do here").await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("no calls planned"));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_catches_planner_panic() {
        let (executor, agent) = echo_agent();
        let agent = agent.with_call_planner(Arc::new(PanickingPlanner));
        let outcome = agent.run("echo hi").await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("planner exploded"));
        assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_converts_planning_error() {
        let (_, agent) = echo_agent();
        let outcome = agent.with_call_planner(Arc::new(FailingPlanner)).run("x").await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("no idea"));
    }

    #[tokio::test]
    async fn test_run_rules_strategy_aggregates_failure() {
        let executor = Arc::new(FakeExecutor::new(file_registry(Err("a.txt"))));
        let planner = Arc::new(
            ToolPlanner::with_default_policy(Arc::new(file_registry(Err("a.txt")))).unwrap(),
        );
        let agent = ToolCallingAgent::with_planner(
            executor,
            planner,
            AgentParams::default().with_strategy(AgentStrategy::Rules),
        );

        let outcome = agent.run("read a.txt and write b.txt").await;
        assert!(!outcome.success);
        assert_eq!(outcome.summary.as_deref(), Some("Executed 2 tool calls, 1 succeeded"));
        assert_eq!(outcome.responses[0].name, "read_file");
        assert_eq!(outcome.responses[1].name, "write_file");
    }

    #[tokio::test]
    async fn test_run_stepwise_read_then_write() {
        let registry = file_registry(Ok("data"));
        let executor = Arc::new(FakeExecutor::new(registry.clone()));
        let planner = Arc::new(ToolPlanner::with_default_policy(Arc::new(registry)).unwrap());
        let agent = ToolCallingAgent::with_planner(executor, planner, AgentParams::default());

        let outcome = agent.run_stepwise("read a.txt and write b.txt").await;
        assert!(outcome.success);
        assert_eq!(outcome.stop_reason, StopReason::NoMoreSteps);
        let tools: Vec<&str> = outcome.steps.iter().map(|s| s.tool.as_str()).collect();
        assert_eq!(tools, vec!["read_file", "write_file"]);
    }

    #[tokio::test]
    async fn test_run_stepwise_respects_max_steps() {
        let registry = file_registry(Ok("data"));
        let executor = Arc::new(FakeExecutor::new(registry.clone()));
        let planner = Arc::new(ToolPlanner::with_default_policy(Arc::new(registry)).unwrap());
        let agent = ToolCallingAgent::with_planner(
            executor,
            planner,
            AgentParams::default().with_max_steps(1),
        );

        let outcome = agent.run_stepwise("read a.txt and write b.txt").await;
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.stop_reason, StopReason::MaxSteps);
    }

    #[tokio::test]
    async fn test_run_stepwise_without_planner() {
        let (_, agent) = echo_agent();
        let outcome = agent.run_stepwise("read a.txt").await;
        assert!(!outcome.success);
        assert_eq!(outcome.stop_reason, StopReason::Failed);
    }
}
