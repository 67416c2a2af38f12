//! Helpers for the runtime values produced while evaluating fragments.
use serde_json::Value;

/// Only `null` and `false` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Compact, single-line representation of a value (`"text"`, `[1,2]`, `null`).
pub fn inspect(value: &Value) -> String {
    value.to_string()
}

/// Indented multi-line representation, used when the compact form is too wide.
pub fn inspect_pretty(value: &Value) -> String {
    format!("{:#}", value)
}

/// The text written to plain-text logs: strings verbatim, anything else inspected.
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => inspect(other),
    }
}

/// Human-readable type name for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
