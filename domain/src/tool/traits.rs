//! Tool domain traits
//!
//! [`Tool`] is the capability interface every concrete tool implements.
//! [`ToolValidator`] is the pure validation seam: [`PresenceValidator`]
//! backs plan validation, [`SchemaValidator`] backs a tool's default
//! parameter validation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::context::ToolContext;
use super::entities::{ToolDefinition, ToolParameter, ToolParams};
use super::value_objects::{ToolError, ToolResult};

/// Outcome of validating a parameter map against a definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// A named capability with a declared parameter schema and an action.
///
/// `execute` returning `Err` means the attempt failed and may be retried by
/// the executor. A tool that wants to report a non-retryable failure returns
/// `Ok(ToolResult::failure(..))` instead.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    fn description(&self) -> &str {
        &self.definition().description
    }

    fn parameters(&self) -> &[ToolParameter] {
        &self.definition().parameters
    }

    async fn execute(&self, ctx: &ToolContext) -> Result<ToolResult, ToolError>;

    fn validate_parameters(&self, params: &ToolParams) -> ValidationReport {
        SchemaValidator.validate(params, self.definition())
    }
}

/// Validator for parameter maps
///
/// Pure domain logic: no I/O.
pub trait ToolValidator {
    fn validate(&self, params: &ToolParams, definition: &ToolDefinition) -> ValidationReport;
}

/// Checks only that every required parameter is present by key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceValidator;

impl ToolValidator for PresenceValidator {
    fn validate(&self, params: &ToolParams, definition: &ToolDefinition) -> ValidationReport {
        let errors = definition
            .required_parameters()
            .filter(|p| !params.contains_key(&p.name))
            .map(|p| {
                format!(
                    "Missing required parameter '{}' for tool '{}'",
                    p.name, definition.name
                )
            })
            .collect();
        ValidationReport::from_errors(errors)
    }
}

/// Presence, value type, enum membership, and nested array/object schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl ToolValidator for SchemaValidator {
    fn validate(&self, params: &ToolParams, definition: &ToolDefinition) -> ValidationReport {
        let mut errors = PresenceValidator.validate(params, definition).errors;

        for param in &definition.parameters {
            if let Some(value) = params.get(&param.name) {
                check_value(&param.name, value, param, &mut errors);
            }
        }

        ValidationReport::from_errors(errors)
    }
}

fn check_value(path: &str, value: &serde_json::Value, param: &ToolParameter, errors: &mut Vec<String>) {
    // Null stands in for "not provided" on optional parameters
    if value.is_null() && !param.required {
        return;
    }

    if !param.param_type.matches(value) {
        errors.push(format!(
            "Parameter '{}' must be of type {}",
            path, param.param_type
        ));
        return;
    }

    if let Some(allowed) = &param.enum_values
        && !allowed.contains(value)
    {
        errors.push(format!("Parameter '{}' must be one of {:?}", path, allowed));
    }

    if let (Some(items), Some(elements)) = (&param.items, value.as_array()) {
        for (i, element) in elements.iter().enumerate() {
            check_value(&format!("{}[{}]", path, i), element, items, errors);
        }
    }

    if let (Some(properties), Some(object)) = (&param.properties, value.as_object()) {
        for property in properties {
            let nested = format!("{}.{}", path, property.name);
            match object.get(&property.name) {
                Some(v) => check_value(&nested, v, property, errors),
                None if property.required => {
                    errors.push(format!("Missing required parameter '{}'", nested));
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ParameterType;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ToolParams {
        serde_json::from_value(value).unwrap()
    }

    fn definition() -> ToolDefinition {
        ToolDefinition::new("test", "test tool")
            .with_parameter(ToolParameter::new("path", "A path", true))
            .with_parameter(
                ToolParameter::new("count", "A count", false).with_type(ParameterType::Number),
            )
            .with_parameter(
                ToolParameter::new("mode", "A mode", false).with_enum([json!("a"), json!("b")]),
            )
    }

    #[test]
    fn test_presence_missing_required() {
        let report = PresenceValidator.validate(&params(json!({})), &definition());
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("'path'"));
    }

    #[test]
    fn test_presence_ignores_types() {
        let report = PresenceValidator.validate(&params(json!({"path": 42})), &definition());
        assert!(report.valid);
    }

    #[test]
    fn test_schema_type_mismatch() {
        let report = SchemaValidator.validate(
            &params(json!({"path": "a", "count": "three"})),
            &definition(),
        );
        assert!(!report.valid);
        assert!(report.errors[0].contains("number"));
    }

    #[test]
    fn test_schema_enum_membership() {
        let report =
            SchemaValidator.validate(&params(json!({"path": "a", "mode": "c"})), &definition());
        assert!(!report.valid);
        assert!(report.errors[0].contains("mode"));
    }

    #[test]
    fn test_schema_optional_null_accepted() {
        let report =
            SchemaValidator.validate(&params(json!({"path": "a", "count": null})), &definition());
        assert!(report.valid);
    }

    #[test]
    fn test_schema_nested_items_and_properties() {
        let def = ToolDefinition::new("batch", "batch tool").with_parameter(
            ToolParameter::new("entries", "Entries", true).with_items(
                ToolParameter::new("entry", "Entry", true)
                    .with_property(ToolParameter::new("name", "Name", true))
                    .with_property(
                        ToolParameter::new("size", "Size", false).with_type(ParameterType::Number),
                    ),
            ),
        );

        let report = SchemaValidator.validate(
            &params(json!({"entries": [{"name": "x", "size": 1}, {"size": "big"}]})),
            &def,
        );

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.contains("entries[1].name")));
        assert!(report.errors.iter().any(|e| e.contains("entries[1].size")));
    }

    #[test]
    fn test_schema_valid_call() {
        let report = SchemaValidator.validate(
            &params(json!({"path": "a", "count": 2, "mode": "b"})),
            &definition(),
        );
        assert_eq!(report, ValidationReport::ok());
    }
}
