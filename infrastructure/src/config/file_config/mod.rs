//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is `#[serde(default)]`, so a partial file is valid; value
//! checks happen afterwards in [`FileConfig::resolve`].

mod agent;
mod executor;
mod planner;
mod tools;

pub use agent::FileAgentConfig;
pub use executor::FileExecutorConfig;
pub use planner::FilePlannerConfig;
pub use tools::FileToolsConfig;

use super::issue::ConfigIssue;
use crate::tools::BUILTIN_TOOL_NAMES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toolweave_application::{AgentParams, AgentStrategy, ExecutorConfig};
use toolweave_domain::DecompositionPolicy;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retry and timeout settings
    pub executor: FileExecutorConfig,
    /// Decomposition locales
    pub planner: FilePlannerConfig,
    /// Tool-calling agent settings
    pub agent: FileAgentConfig,
    /// Tool registry settings
    pub tools: FileToolsConfig,
}

/// Typed settings ready to wire into the application layer
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub executor: ExecutorConfig,
    pub policy: DecompositionPolicy,
    pub agent: AgentParams,
    /// Empty means every built-in tool
    pub enabled_tools: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Convert every section, collecting the issues found along the way.
    ///
    /// Invalid values are replaced by their defaults, so the result is
    /// always usable.
    pub fn resolve(&self) -> (ResolvedConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (executor, executor_issues) = self.executor.to_executor_config();
        issues.extend(executor_issues);

        let (policy, planner_issues) = self.planner.to_policy();
        issues.extend(planner_issues);

        let (agent, agent_issues) = self.agent.to_agent_params();
        issues.extend(agent_issues);

        let (enabled_tools, tool_issues) = self.tools.parse_enabled();
        issues.extend(tool_issues);

        if agent.strategy == AgentStrategy::Trigger {
            if !BUILTIN_TOOL_NAMES.contains(&agent.trigger_tool.as_str()) {
                issues.push(ConfigIssue::unknown_tool("agent.trigger_tool", &agent.trigger_tool));
            } else if !enabled_tools.is_empty() && !enabled_tools.contains(&agent.trigger_tool) {
                issues.push(ConfigIssue::invalid_value(
                    "agent.trigger_tool",
                    format!("'{}' is not in tools.enabled", agent.trigger_tool),
                ));
            }
        }

        let resolved = ResolvedConfig {
            executor,
            policy,
            agent,
            enabled_tools,
            working_dir: self.tools.working_dir_path(),
        };
        (resolved, issues)
    }

    /// Validate the configuration and return all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.resolve().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use toolweave_domain::Locale;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[executor]
timeout_ms = 2000
max_retries = 1
retry_delay_ms = 10
abort_on_timeout = true

[planner]
locales = ["en"]

[agent]
trigger_phrase = "say"
trigger_tool = "echo"
strategy = "rules"
max_steps = 4

[tools]
working_dir = "/tmp"
enabled = ["read_file", "write_file", "echo"]
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (resolved, issues) = config.resolve();
        assert!(issues.is_empty(), "{:?}", issues);
        assert_eq!(resolved.executor.timeout, Duration::from_millis(2000));
        assert_eq!(resolved.executor.max_retries, 1);
        assert!(resolved.executor.abort_on_timeout);
        assert!(resolved.policy.locale(Locale::Ja).is_none());
        assert_eq!(resolved.agent.strategy, AgentStrategy::Rules);
        assert_eq!(resolved.agent.max_steps, 4);
        assert_eq!(resolved.enabled_tools.len(), 3);
        assert_eq!(resolved.working_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[executor]
max_retries = 0
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.executor.max_retries, 0);
        assert_eq!(config.executor.timeout_ms, 30_000);
        assert_eq!(config.agent, FileAgentConfig::default());
        assert!(config.tools.enabled.is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let toml_str = r#"
[planner]
locales = ["klingon"]

[agent]
strategy = "magic"
trigger_tool = "teleport"

[tools]
enabled = ["nope"]
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4, "{:?}", issues);
        assert!(issues.iter().all(|i| !i.is_error()));
    }

    #[test]
    fn test_trigger_tool_must_be_enabled() {
        let toml_str = r#"
[tools]
enabled = ["read_file"]
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("tools.enabled"));
    }

    #[test]
    fn test_rules_strategy_ignores_trigger_tool() {
        let toml_str = r#"
[agent]
strategy = "rules"
trigger_tool = "teleport"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());
    }
}
