//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::value_objects::ToolResult;

/// Parameter map passed to a tool invocation
pub type ToolParams = HashMap<String, serde_json::Value>;

/// JSON-level type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Object => "object",
            ParameterType::Array => "array",
        }
    }

    /// Whether a JSON value has this type
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Number => value.is_number(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Object => value.is_object(),
            ParameterType::Array => value.is_array(),
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter specification for a tool
///
/// Recursive: `items` describes the element schema of an array parameter,
/// `properties` the fields of an object parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Parameter description
    pub description: String,
    /// Whether this parameter must be present in every invocation
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ToolParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ToolParameter>>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type: ParameterType::String,
            description: description.into(),
            required,
            default_value: None,
            enum_values: None,
            items: None,
            properties: None,
        }
    }

    pub fn with_type(mut self, param_type: ParameterType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_enum(mut self, values: impl IntoIterator<Item = serde_json::Value>) -> Self {
        self.enum_values = Some(values.into_iter().collect());
        self
    }

    /// Describe the element schema of an array parameter
    pub fn with_items(mut self, items: ToolParameter) -> Self {
        self.param_type = ParameterType::Array;
        self.items = Some(Box::new(items));
        self
    }

    /// Add a field to an object parameter
    pub fn with_property(mut self, property: ToolParameter) -> Self {
        self.param_type = ParameterType::Object;
        self.properties.get_or_insert_with(Vec::new).push(property);
        self
    }
}

/// Definition of a tool that can be registered and invoked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool within a registry (e.g., "read_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

/// A request to execute a tool, keyed by a correlation id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Caller-chosen or generated correlation id
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: ToolParams,
}

impl ToolCallRequest {
    /// Create a request with a generated correlation id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(format!("call_{}", uuid::Uuid::new_v4().simple()), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: ToolParams) -> Self {
        self.arguments = arguments;
        self
    }
}

/// Outcome of a [`ToolCallRequest`], carrying the request's id verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub id: String,
    pub name: String,
    pub result: ToolResult,
}

impl ToolCallResponse {
    pub fn new(request: &ToolCallRequest, result: ToolResult) -> Self {
        Self {
            id: request.id.clone(),
            name: request.name.clone(),
            result,
        }
    }
}

/// Ordered list of tool calls plus the reasoning that produced them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallPlan {
    pub calls: Vec<ToolCallRequest>,
    pub reasoning: String,
}

impl ToolCallPlan {
    pub fn new(reasoning: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            reasoning: reasoning.into(),
        }
    }

    pub fn with_call(mut self, call: ToolCallRequest) -> Self {
        self.calls.push(call);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("read_file", "Read file contents")
            .with_parameter(ToolParameter::new("path", "File path to read", true))
            .with_parameter(
                ToolParameter::new("limit", "Maximum lines", false).with_type(ParameterType::Number),
            );

        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.parameters[0].name, "path");
        assert_eq!(tool.required_parameters().count(), 1);
    }

    #[test]
    fn test_nested_parameter_builders() {
        let param = ToolParameter::new("files", "Files to touch", true)
            .with_items(ToolParameter::new("file", "Single file", true).with_property(
                ToolParameter::new("path", "Path", true),
            ));

        assert_eq!(param.param_type, ParameterType::Array);
        let item = param.items.as_ref().unwrap();
        assert_eq!(item.param_type, ParameterType::Object);
        assert_eq!(item.properties.as_ref().unwrap()[0].name, "path");
    }

    #[test]
    fn test_parameter_serializes_type_and_enum_keys() {
        let param = ToolParameter::new("mode", "Mode", false)
            .with_enum([json!("fast"), json!("slow")])
            .with_default("fast");
        let value = serde_json::to_value(&param).unwrap();

        assert_eq!(value["type"], "string");
        assert_eq!(value["enum"][1], "slow");
        assert_eq!(value["default_value"], "fast");
        assert!(value.get("items").is_none());
    }

    #[test]
    fn test_parameter_type_matches() {
        assert!(ParameterType::String.matches(&json!("x")));
        assert!(ParameterType::Number.matches(&json!(1.5)));
        assert!(!ParameterType::Number.matches(&json!("1")));
        assert!(ParameterType::Array.matches(&json!([])));
        assert!(ParameterType::Object.matches(&json!({})));
        assert!(ParameterType::Boolean.matches(&json!(false)));
    }

    #[test]
    fn test_call_request_generates_unique_ids() {
        let a = ToolCallRequest::new("echo");
        let b = ToolCallRequest::new("echo");
        assert!(a.id.starts_with("call_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_call_response_preserves_id() {
        let request = ToolCallRequest::with_id("a", "echo").with_arg("message", "hi");
        let response = ToolCallResponse::new(&request, ToolResult::success(json!("hi")));
        assert_eq!(response.id, "a");
        assert_eq!(response.name, "echo");
    }
}
