//! Tool Planner use case.
//!
//! Keyword-driven task decomposition over a [`ToolRegistry`]. The planner
//! holds no language knowledge of its own: trigger words, per-tool keywords
//! and extraction patterns all come from the [`DecompositionPolicy`].
//!
//! ```text
//! task ──▶ detect triggers ──▶ one PlanStep per category ──▶ ToolPlan
//!              │                (read, write, search, execute)
//!              └─ none ──▶ select_tools ──▶ top candidate step
//! ```

use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use toolweave_domain::planning::{
    DecompositionPolicy, ExecutionContext, ObjectPosition, PlanStep, TaskCategory, ToolCandidate,
    ToolPlan, ToolSelection, find_keyword, find_keyword_from,
};
use toolweave_domain::tool::{
    PresenceValidator, ToolDefinition, ToolRegistry, ToolValidator, ValidationReport,
};
use tracing::{debug, trace};

/// Errors raised while building or validating plans
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Invalid extraction pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Plan failed validation: {}", .0.join("; "))]
    InvalidPlan(Vec<String>),

    #[error("Planning failed: {0}")]
    Failed(String),
}

const NO_MATCH_REASONING: &str = "No tool matched the task; showing all available tools";

/// Description words too common to say anything about a tool
const STOPWORDS: &[&str] = &[
    "with", "from", "that", "this", "into", "given", "returns", "optional", "their", "when",
];

struct CompiledPatterns {
    path: Vec<Regex>,
    query: Vec<Regex>,
    command: Vec<Regex>,
}

#[derive(Debug, Clone)]
struct TriggerHit {
    category: TaskCategory,
    locale: usize,
    keyword: String,
    start: usize,
    end: usize,
}

/// Rule-based planner over a registry and a decomposition policy.
pub struct ToolPlanner {
    registry: Arc<ToolRegistry>,
    policy: DecompositionPolicy,
    /// Parallel to `policy.locales`
    patterns: Vec<CompiledPatterns>,
}

impl ToolPlanner {
    pub fn new(registry: Arc<ToolRegistry>, policy: DecompositionPolicy) -> Result<Self, PlanningError> {
        let patterns = policy
            .locales
            .iter()
            .map(|locale| {
                Ok(CompiledPatterns {
                    path: compile_all(&locale.patterns.path)?,
                    query: compile_all(&locale.patterns.query)?,
                    command: compile_all(&locale.patterns.command)?,
                })
            })
            .collect::<Result<Vec<_>, PlanningError>>()?;

        Ok(Self {
            registry,
            policy,
            patterns,
        })
    }

    /// Planner with the built-in English and Japanese policy
    pub fn with_default_policy(registry: Arc<ToolRegistry>) -> Result<Self, PlanningError> {
        Self::new(registry, DecompositionPolicy::default())
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &DecompositionPolicy {
        &self.policy
    }

    /// Rank registered tools by keyword overlap with the task.
    ///
    /// Never returns an empty candidate list for a non-empty registry: when
    /// nothing matches, every tool is returned in registration order.
    pub fn select_tools(&self, task: &str) -> ToolSelection {
        let mut candidates: Vec<ToolCandidate> = self
            .registry
            .definitions()
            .map(|definition| {
                let matched_keywords: Vec<String> = self
                    .keywords_for(definition)
                    .into_iter()
                    .filter(|k| find_keyword(task, k).is_some())
                    .collect();
                ToolCandidate {
                    definition: definition.clone(),
                    score: matched_keywords.len(),
                    matched_keywords,
                }
            })
            .collect();

        if candidates.iter().all(|c| c.score == 0) {
            debug!(tools = candidates.len(), "No tool matched task");
            return ToolSelection {
                candidates,
                reasoning: NO_MATCH_REASONING.to_string(),
                matched: false,
            };
        }

        candidates.retain(|c| c.score > 0);
        // Stable sort: ties keep registration order
        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        let reasoning = format!(
            "Matched {} tool(s) by keyword: {}",
            candidates.len(),
            candidates
                .iter()
                .map(|c| format!(
                    "{} ({})",
                    c.definition.name,
                    c.matched_keywords.join(", ")
                ))
                .collect::<Vec<_>>()
                .join("; ")
        );

        ToolSelection {
            candidates,
            reasoning,
            matched: true,
        }
    }

    /// Decompose a task into one step per triggered category.
    ///
    /// Steps are emitted in the fixed order read, write, search, execute.
    /// When no category triggers, falls back to the top-ranked tool from
    /// [`select_tools`](Self::select_tools).
    pub fn create_plan(&self, task: &str) -> ToolPlan {
        let hits = self.detect_triggers(task);

        if hits.is_empty() {
            return self.fallback_plan(task);
        }

        let mut plan = ToolPlan::new();
        for category in TaskCategory::ALL {
            if let Some(index) = hits.iter().position(|h| h.category == category) {
                plan.push(self.build_step(task, &hits, index));
            }
        }

        debug!(steps = plan.len(), tools = ?plan.tool_names(), "Created plan");
        plan
    }

    /// Suggest the next step given partial execution history.
    ///
    /// Rules fire in policy order; the first that applies wins. `None`
    /// means there is nothing left to do.
    pub fn suggest_next_tool(&self, context: &ExecutionContext) -> Option<PlanStep> {
        let task = context.original_task.as_str();
        let hits = self.detect_triggers(task);

        for rule in &self.policy.suggestion_rules {
            let Some(index) = hits.iter().position(|h| h.category == rule.category) else {
                continue;
            };
            let Some(tool) = self.policy.tool_for(rule.category) else {
                continue;
            };
            if context.has_run(tool) {
                continue;
            }

            let prerequisite = match rule.requires {
                Some(required) => {
                    let Some(required_tool) = self.policy.tool_for(required) else {
                        continue;
                    };
                    match context.last_success(required_tool) {
                        Some(result) => Some(result),
                        None => continue,
                    }
                }
                None => None,
            };

            let mut step = self.build_step(task, &hits, index);

            // A gated write carries forward what the read produced
            if rule.category == TaskCategory::Write
                && let Some(text) = prerequisite.and_then(|r| r.text())
            {
                step.parameters
                    .insert("content".to_string(), serde_json::Value::from(text));
                step.parameter_hints.remove("content");
            }

            debug!(tool = %step.tool, completed = context.len(), "Suggested next step");
            return Some(step);
        }

        trace!(completed = context.len(), "No further steps");
        None
    }

    /// Check every step names a registered tool and carries every required
    /// parameter by key. Value types are not checked.
    pub fn validate_plan(&self, plan: &ToolPlan) -> ValidationReport {
        let mut errors = Vec::new();

        for step in plan.iter() {
            match self.registry.definition(&step.tool) {
                None => errors.push(format!("Unknown tool: {}", step.tool)),
                Some(definition) => {
                    errors.extend(PresenceValidator.validate(&step.parameters, definition).errors)
                }
            }
        }

        ValidationReport::from_errors(errors)
    }

    // ==================== Internals ====================

    fn keywords_for(&self, definition: &ToolDefinition) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();

        let from_description = definition
            .description
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .map(|token| token.to_lowercase())
            .filter(|token| token.chars().count() > 3 && !STOPWORDS.contains(&token.as_str()));

        let from_policy = self
            .policy
            .tool_keywords(&definition.name)
            .map(str::to_string);

        for keyword in from_description.chain(from_policy) {
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        keywords
    }

    /// Earliest trigger per category, sorted by position in the task
    fn detect_triggers(&self, task: &str) -> Vec<TriggerHit> {
        let mut hits: Vec<TriggerHit> = Vec::new();

        for category in TaskCategory::ALL {
            let mut best: Option<TriggerHit> = None;
            for (locale_index, locale) in self.policy.locales.iter().enumerate() {
                for keyword in locale.triggers_for(category) {
                    if let Some((start, end)) = self.first_unshadowed(task, category, keyword)
                        && best.as_ref().is_none_or(|b| start < b.start)
                    {
                        best = Some(TriggerHit {
                            category,
                            locale: locale_index,
                            keyword: keyword.clone(),
                            start,
                            end,
                        });
                    }
                }
            }
            if let Some(hit) = best {
                trace!(category = %hit.category, keyword = %hit.keyword, at = hit.start, "Trigger");
                hits.push(hit);
            }
        }

        hits.sort_by_key(|h| h.start);
        hits
    }

    /// First occurrence of `keyword` not covered by a longer trigger of
    /// another category (`見` inside `見つけ`).
    fn first_unshadowed(&self, task: &str, category: TaskCategory, keyword: &str) -> Option<(usize, usize)> {
        let mut from = 0;
        while let Some((start, end)) = find_keyword_from(task, keyword, from) {
            if !self.is_shadowed(task, category, start, end) {
                return Some((start, end));
            }
            from = end;
        }
        None
    }

    fn is_shadowed(&self, task: &str, category: TaskCategory, start: usize, end: usize) -> bool {
        let longer = self.policy.locales.iter().flat_map(|locale| {
            TaskCategory::ALL
                .into_iter()
                .filter(move |c| *c != category)
                .flat_map(move |c| locale.triggers_for(c))
        });

        longer
            .filter(|other| other.len() > end - start)
            .any(|other| {
                let mut from = 0;
                while let Some((s, e)) = find_keyword_from(task, other, from) {
                    if s > start {
                        return false;
                    }
                    if e >= end {
                        return true;
                    }
                    from = s + 1;
                }
                false
            })
    }

    /// Text a trigger's parameters are extracted from.
    ///
    /// For verb-first locales this runs from the trigger up to the next
    /// trigger; for verb-last locales from the previous trigger up to this
    /// one.
    fn segment<'a>(&self, task: &'a str, hits: &[TriggerHit], index: usize) -> &'a str {
        let hit = &hits[index];
        match self.policy.locales[hit.locale].object_position {
            ObjectPosition::AfterTrigger => {
                let end = hits
                    .get(index + 1)
                    .map(|next| next.start.max(hit.end))
                    .unwrap_or(task.len());
                &task[hit.start..end]
            }
            ObjectPosition::BeforeTrigger => {
                let start = index
                    .checked_sub(1)
                    .map(|prev| hits[prev].end.min(hit.start))
                    .unwrap_or(0);
                &task[start..hit.start]
            }
        }
    }

    fn build_step(&self, task: &str, hits: &[TriggerHit], index: usize) -> PlanStep {
        let hit = &hits[index];
        let segment = self.segment(task, hits, index);
        let patterns = &self.patterns[hit.locale];
        let tool = self
            .policy
            .tool_for(hit.category)
            .unwrap_or(hit.category.as_str())
            .to_string();
        let reason = format!(
            "Task asks to {} (matched '{}')",
            hit.category, hit.keyword
        );
        let mut step = PlanStep::new(tool.clone(), reason);

        let (param, regexes) = match hit.category {
            TaskCategory::Read | TaskCategory::Write => ("path", &patterns.path),
            TaskCategory::Search => ("query", &patterns.query),
            TaskCategory::Execute => ("command", &patterns.command),
        };

        step = match first_capture(regexes, segment) {
            Some(value) => step.with_param(param, value),
            None => step.with_hint(param, self.hint_for(&tool, param)),
        };

        if hit.category == TaskCategory::Write {
            step = step
                .with_param("content", "")
                .with_hint("content", self.hint_for(&tool, "content"));
        }

        step
    }

    fn fallback_plan(&self, task: &str) -> ToolPlan {
        let selection = self.select_tools(task);
        let Some(top) = selection.top() else {
            return ToolPlan::new();
        };

        let mut step = PlanStep::new(top.definition.name.clone(), selection.reasoning.clone());
        for param in top.definition.required_parameters() {
            step = step.with_hint(param.name.clone(), self.hint_for(&top.definition.name, &param.name));
        }

        debug!(tool = %step.tool, "No category triggered; using top-ranked tool");
        ToolPlan::new().with_step(step)
    }

    fn hint_for(&self, tool: &str, param: &str) -> String {
        let described = self
            .registry
            .definition(tool)
            .and_then(|d| d.parameters.iter().find(|p| p.name == param))
            .map(|p| p.description.clone());

        match described {
            Some(description) => format!("{} (not found in task)", description),
            None => format!("Provide '{}' for {}", param, tool),
        }
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, PlanningError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| PlanningError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

/// First capture group of the first pattern that matches
fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}
