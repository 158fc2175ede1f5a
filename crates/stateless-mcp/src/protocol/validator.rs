//! Argument validation against declared input schemas.
//!
//! Covers the JSON Schema subset the registry declares: `type`, `properties`,
//! `required`, `minimum`, and `additionalProperties: false`.

use serde_json::{Map, Value};

use crate::types::{McpError, McpResult, PromptDefinition};

/// Check tool arguments against an input schema.
pub fn validate_arguments(schema: &Value, arguments: &Value) -> McpResult<()> {
    validate_at("arguments", schema, arguments)
}

/// Check prompt arguments: an object of strings with every required key present.
pub fn validate_prompt_arguments(definition: &PromptDefinition, arguments: &Value) -> McpResult<()> {
    let object = arguments
        .as_object()
        .ok_or_else(|| McpError::InvalidParams("prompt arguments must be an object".to_string()))?;

    for (key, value) in object {
        if !value.is_string() {
            return Err(McpError::InvalidParams(format!(
                "prompt argument '{key}' must be a string"
            )));
        }
    }

    for arg in definition.arguments.iter().flatten() {
        if arg.required && !object.contains_key(&arg.name) {
            return Err(McpError::InvalidParams(format!(
                "'{}' argument is required",
                arg.name
            )));
        }
    }
    Ok(())
}

fn validate_at(path: &str, schema: &Value, value: &Value) -> McpResult<()> {
    let Some(schema) = schema.as_object() else {
        return Ok(());
    };

    if let Some(expected) = schema.get("type").and_then(Value::as_str) {
        if !matches_type(expected, value) {
            return Err(McpError::InvalidParams(format!(
                "{path}: expected {expected}, got {}",
                type_name(value)
            )));
        }
    }

    if let (Some(minimum), Some(n)) = (schema.get("minimum").and_then(Value::as_f64), value.as_f64()) {
        if n < minimum {
            return Err(McpError::InvalidParams(format!(
                "{path}: must be >= {minimum}"
            )));
        }
    }

    if let Some(object) = value.as_object() {
        validate_object(path, schema, object)?;
    }
    Ok(())
}

fn validate_object(path: &str, schema: &Map<String, Value>, object: &Map<String, Value>) -> McpResult<()> {
    let properties = schema.get("properties").and_then(Value::as_object);

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(key) {
                return Err(McpError::InvalidParams(format!(
                    "{path}: missing required property '{key}'"
                )));
            }
        }
    }

    let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));
    for (key, value) in object {
        match properties.and_then(|p| p.get(key)) {
            Some(property) => validate_at(&format!("{path}.{key}"), property, value)?,
            None if closed => {
                return Err(McpError::InvalidParams(format!(
                    "{path}: unexpected property '{key}'"
                )))
            }
            None => {}
        }
    }
    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
