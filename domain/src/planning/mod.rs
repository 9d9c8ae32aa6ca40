//! Planning domain module
//!
//! Pure data for task decomposition: plans and their steps, the execution
//! history used for next-step suggestions, and the [`DecompositionPolicy`]
//! holding all language-specific keyword tables.

pub mod entities;
pub mod policy;

pub use entities::{CompletedStep, ExecutionContext, PlanStep, ToolCandidate, ToolPlan, ToolSelection};
pub use policy::{
    DecompositionPolicy, ExtractionPatterns, Locale, LocaleKeywords, ObjectPosition,
    SuggestionRule, TaskCategory, find_keyword, find_keyword_from,
};
