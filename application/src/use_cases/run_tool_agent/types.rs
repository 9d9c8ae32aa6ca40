//! Type definitions for the tool-calling agent.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolweave_domain::{CompletedStep, ToolCallResponse};

use crate::use_cases::tool_planner::PlanningError;

/// Errors that can occur while the agent plans or executes.
///
/// These never escape [`run`](super::ToolCallingAgent::run); they are folded
/// into an [`AgentRunOutcome`].
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Planning failed: {0}")]
    Planning(#[from] PlanningError),

    #[error("Agent panicked: {0}")]
    Panicked(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result of a single `run` over a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRunOutcome {
    /// AND of every call's success; false when nothing was planned
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub responses: Vec<ToolCallResponse>,
}

impl AgentRunOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            summary: None,
            error: Some(error.into()),
            reasoning: None,
            responses: Vec::new(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn succeeded_count(&self) -> usize {
        self.responses.iter().filter(|r| r.result.success).count()
    }
}

/// Why the stepwise loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The planner had nothing more to suggest
    NoMoreSteps,
    /// The step bound was reached
    MaxSteps,
    /// The loop could not start
    Failed,
}

/// Result of `run_stepwise`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepwiseOutcome {
    pub success: bool,
    pub steps: Vec<CompletedStep>,
    pub stop_reason: StopReason,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepwiseOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            success: false,
            steps: Vec::new(),
            stop_reason: StopReason::Failed,
            summary: error.clone(),
            error: Some(error),
        }
    }
}
