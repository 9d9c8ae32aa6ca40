//! Structured configuration issues.
//!
//! Parsing never fails on a bad value: the offending field falls back to its
//! default and an issue is recorded so the binary can warn about it.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default was used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field holds a value outside its accepted set
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is out of range
    InvalidValue { field: String },
    /// A tool name that no built-in tool answers to
    UnknownTool { field: String, name: String },
}

/// A detected issue in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn invalid_enum(field: &str, value: &str, valid_values: &[&str]) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!(
                "{}: unknown value '{}' (expected one of: {}), using default",
                field,
                value,
                valid_values.join(", ")
            ),
            code: ConfigIssueCode::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                valid_values: valid_values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: ConfigIssueCode::InvalidValue {
                field: field.to_string(),
            },
            message: format!("{}: {}", field, message.into()),
        }
    }

    pub fn unknown_tool(field: &str, name: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: ConfigIssueCode::UnknownTool {
                field: field.to_string(),
                name: name.to_string(),
            },
            message: format!("{}: unknown tool '{}'", field, name),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
