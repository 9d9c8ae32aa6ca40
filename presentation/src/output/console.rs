//! Console output formatter for plans and tool results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use toolweave_application::{AgentRunOutcome, StepwiseOutcome, StopReason};
use toolweave_domain::{
    ToolCallResponse, ToolDefinition, ToolPlan, ToolResult, ToolSelection, ValidationReport,
};

/// Longest payload printed inline before it is cut
const MAX_INLINE_OUTPUT: usize = 4000;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        format!(
            "{}\n{}\n{}\n",
            "=".repeat(60).cyan(),
            title.cyan().bold(),
            "=".repeat(60).cyan()
        )
    }

    fn status(success: bool) -> String {
        if success {
            "OK".green().bold().to_string()
        } else {
            "FAILED".red().bold().to_string()
        }
    }

    fn truncate(text: &str) -> String {
        if text.len() <= MAX_INLINE_OUTPUT {
            return text.to_string();
        }
        let mut cut = MAX_INLINE_OUTPUT;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}\n... ({} more bytes)", &text[..cut], text.len() - cut)
    }

    fn result_body(result: &ToolResult) -> String {
        let mut output = String::new();

        if let Some(error) = result.error() {
            output.push_str(&format!("  {} {}\n", format!("[{}]", error.kind).red(), error));
        } else if let Some(text) = result.text() {
            for line in Self::truncate(text).lines() {
                output.push_str(&format!("  {}\n", line));
            }
        } else if let Some(data) = &result.data {
            output.push_str(&format!("  {}\n", data));
        }

        let meta = &result.metadata;
        let mut facts = Vec::new();
        if let Some(attempts) = meta.attempts {
            facts.push(format!("attempts={}", attempts));
        }
        if let Some(ms) = meta.execution_time_ms {
            facts.push(format!("{}ms", ms));
        }
        if let Some(code) = meta.exit_code {
            facts.push(format!("exit={}", code));
        }
        if let Some(count) = meta.match_count {
            facts.push(format!("matches={}", count));
        }
        if !facts.is_empty() {
            output.push_str(&format!("  {}\n", facts.join(" ").dimmed()));
        }

        output
    }

    fn response(index: usize, response: &ToolCallResponse) -> String {
        format!(
            "\n{} {} {} {}\n{}",
            format!("{}.", index + 1).bold(),
            response.name.yellow().bold(),
            format!("({})", response.id).dimmed(),
            Self::status(response.result.success),
            Self::result_body(&response.result)
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_plan(&self, plan: &ToolPlan, report: &ValidationReport) -> String {
        let mut output = Self::header("Tool Plan");

        if plan.is_empty() {
            output.push_str("\n(no steps)\n");
        }

        for (i, step) in plan.iter().enumerate() {
            output.push_str(&format!(
                "\n{} {}\n  {}\n",
                format!("{}.", i + 1).bold(),
                step.tool.yellow().bold(),
                step.reason
            ));

            let mut params: Vec<_> = step.parameters.iter().collect();
            params.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in params {
                output.push_str(&format!("  {} = {}\n", key.cyan(), value));
            }
            for (key, hint) in &step.parameter_hints {
                output.push_str(&format!("  {} {}: {}\n", "hint".magenta(), key, hint));
            }
        }

        output.push('\n');
        if report.valid {
            output.push_str(&format!("{}\n", "Plan is valid".green().bold()));
        } else {
            output.push_str(&format!("{}\n", "Plan is invalid:".red().bold()));
            for error in &report.errors {
                output.push_str(&format!("  * {}\n", error));
            }
        }

        output
    }

    fn format_selection(&self, selection: &ToolSelection) -> String {
        let mut output = Self::header("Tool Selection");
        output.push_str(&format!("\n{} {}\n\n", "Reasoning:".cyan().bold(), selection.reasoning));

        for candidate in &selection.candidates {
            let keywords = if candidate.matched_keywords.is_empty() {
                String::new()
            } else {
                format!(" [{}]", candidate.matched_keywords.join(", "))
            };
            output.push_str(&format!(
                "  {:>3}  {}{}\n       {}\n",
                candidate.score,
                candidate.definition.name.yellow().bold(),
                keywords.dimmed(),
                candidate.definition.description
            ));
        }

        output
    }

    fn format_run(&self, outcome: &AgentRunOutcome) -> String {
        let mut output = Self::header("Agent Run");

        if let Some(reasoning) = &outcome.reasoning {
            output.push_str(&format!("\n{} {}\n", "Reasoning:".cyan().bold(), reasoning));
        }

        for (i, response) in outcome.responses.iter().enumerate() {
            output.push_str(&Self::response(i, response));
        }

        output.push('\n');
        if let Some(summary) = &outcome.summary {
            output.push_str(&format!("{} {}\n", Self::status(outcome.success), summary));
        }
        if let Some(error) = &outcome.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }

        output
    }

    fn format_stepwise(&self, outcome: &StepwiseOutcome) -> String {
        let mut output = Self::header("Stepwise Run");

        for (i, step) in outcome.steps.iter().enumerate() {
            output.push_str(&format!(
                "\n{} {} {}\n{}",
                format!("{}.", i + 1).bold(),
                step.tool.yellow().bold(),
                Self::status(step.result.success),
                Self::result_body(&step.result)
            ));
        }

        let reason = match outcome.stop_reason {
            StopReason::NoMoreSteps => "no more steps",
            StopReason::MaxSteps => "step limit reached",
            StopReason::Failed => "failed",
        };
        output.push_str(&format!(
            "\n{} {} {}\n",
            Self::status(outcome.success),
            outcome.summary,
            format!("({})", reason).dimmed()
        ));

        output
    }

    fn format_result(&self, tool: &str, result: &ToolResult) -> String {
        format!(
            "{} {}\n{}",
            tool.yellow().bold(),
            Self::status(result.success),
            Self::result_body(result)
        )
    }

    fn format_tools(&self, tools: &[&ToolDefinition]) -> String {
        let mut output = Self::header("Available Tools");

        for tool in tools {
            output.push_str(&format!("\n{}\n  {}\n", tool.name.yellow().bold(), tool.description));
            for param in &tool.parameters {
                let required = if param.required { "required" } else { "optional" };
                output.push_str(&format!(
                    "    {} {} {}\n",
                    param.name.cyan(),
                    format!("({}, {:?})", required, param.param_type).dimmed(),
                    param.description
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolweave_domain::{PlanStep, ToolError, ToolResultMetadata};

    #[test]
    fn test_format_plan_lists_steps_and_hints() {
        let plan = ToolPlan::new()
            .with_step(PlanStep::new("read_file", "Read config.toml").with_param("path", "config.toml"))
            .with_step(
                PlanStep::new("write_file", "Write the result")
                    .with_param("path", "out.txt")
                    .with_hint("content", "Content to write (not found in task)"),
            );

        let output = ConsoleFormatter.format_plan(&plan, &ValidationReport::ok());
        assert!(output.contains("Read config.toml"));
        assert!(output.contains("\"out.txt\""));
        assert!(output.contains("Content to write (not found in task)"));
        assert!(output.contains("Plan is valid"));
    }

    #[test]
    fn test_format_plan_reports_errors() {
        let report = ValidationReport::from_errors(vec!["Unknown tool: teleport".to_string()]);
        let output = ConsoleFormatter.format_plan(&ToolPlan::new(), &report);
        assert!(output.contains("(no steps)"));
        assert!(output.contains("Unknown tool: teleport"));
    }

    #[test]
    fn test_format_result_shows_error_and_metadata() {
        let result = ToolResult::failure(ToolError::not_found("a.txt")).with_metadata(ToolResultMetadata {
            attempts: Some(1),
            execution_time_ms: Some(3),
            ..Default::default()
        });

        let output = ConsoleFormatter.format_result("read_file", &result);
        assert!(output.contains("Resource not found: a.txt"));
        assert!(output.contains("attempts=1 3ms"));
    }

    #[test]
    fn test_truncate_long_output() {
        let long = "x".repeat(MAX_INLINE_OUTPUT + 10);
        let cut = ConsoleFormatter::truncate(&long);
        assert!(cut.ends_with("(10 more bytes)"));
    }
}
