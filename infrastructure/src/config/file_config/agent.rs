//! Agent configuration from TOML (`[agent]` section)

use crate::config::issue::ConfigIssue;
use serde::{Deserialize, Serialize};
use toolweave_application::{AgentParams, AgentStrategy};

const VALID_STRATEGIES: &[&str] = &["trigger", "rules"];

/// Raw agent configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Phrase the trigger strategy looks for
    pub trigger_phrase: String,
    /// Tool invoked when the phrase is found
    pub trigger_tool: String,
    /// "trigger" or "rules"
    pub strategy: String,
    /// Bound on the step-by-step loop
    pub max_steps: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let params = AgentParams::default();
        Self {
            trigger_phrase: params.trigger_phrase,
            trigger_tool: params.trigger_tool,
            strategy: AgentStrategy::default().to_string(),
            max_steps: params.max_steps,
        }
    }
}

impl FileAgentConfig {
    pub fn parse_strategy(&self) -> (AgentStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<AgentStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => (
                AgentStrategy::default(),
                vec![ConfigIssue::invalid_enum(
                    "agent.strategy",
                    &self.strategy,
                    VALID_STRATEGIES,
                )],
            ),
        }
    }

    /// Convert to [`AgentParams`], replacing invalid values with defaults.
    pub fn to_agent_params(&self) -> (AgentParams, Vec<ConfigIssue>) {
        let defaults = AgentParams::default();
        let (strategy, mut issues) = self.parse_strategy();

        let phrase = if self.trigger_phrase.trim().is_empty() {
            issues.push(ConfigIssue::invalid_value(
                "agent.trigger_phrase",
                "must not be empty, using default",
            ));
            defaults.trigger_phrase.clone()
        } else {
            self.trigger_phrase.trim().to_string()
        };

        let max_steps = if self.max_steps == 0 {
            issues.push(ConfigIssue::invalid_value(
                "agent.max_steps",
                format!("must be greater than 0, using {}", defaults.max_steps),
            ));
            defaults.max_steps
        } else {
            self.max_steps
        };

        let params = defaults
            .with_trigger(phrase, self.trigger_tool.clone())
            .with_strategy(strategy)
            .with_max_steps(max_steps);

        (params, issues)
    }
}
