//! Parameters of the requests this server answers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Absent and `null` arguments both mean "no arguments".
fn object_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_object))
}

/// `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default = "empty_object", deserialize_with = "object_or_empty")]
    pub arguments: Value,
}

/// `resources/read`. Resources are addressed by URI, never by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceReadParams {
    pub uri: String,
}

/// `prompts/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default = "empty_object", deserialize_with = "object_or_empty")]
    pub arguments: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_or_null_arguments_become_empty_object() {
        let params: ToolCallParams = serde_json::from_value(json!({"name": "ping"})).unwrap();
        assert_eq!(params.arguments, json!({}));

        let params: PromptGetParams =
            serde_json::from_value(json!({"name": "greeting-template", "arguments": null})).unwrap();
        assert_eq!(params.arguments, json!({}));
    }
}
