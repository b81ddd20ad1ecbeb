//! Parameter schemas and argument validation
//!
//! Schemas are derived from the parameter structs. Reasoning models only
//! accept the strict variant: every property required, no defaults and no
//! additional properties.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use validator::Validate;

use cluezy_core::traits::tools::{ToolError, ToolResult};

/// JSON Schema of `T`, strict or standard
pub fn parameters_schema<T: JsonSchema>(strict: bool) -> Value {
    let mut value = serde_json::to_value(schemars::schema_for!(T))
        .unwrap_or_else(|_| json!({ "type": "object" }));

    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        map.remove("title");
    }
    if strict {
        make_strict(&mut value);
    }
    value
}

fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("default");
            if let Some(Value::Object(properties)) = map.get("properties") {
                let required: Vec<Value> =
                    properties.keys().cloned().map(Value::String).collect();
                map.insert("required".to_string(), Value::Array(required));
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            for child in map.values_mut() {
                make_strict(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}

/// Deserialize and validate tool arguments before any external call
pub fn parse_args<T: DeserializeOwned + Validate>(args: Value) -> ToolResult<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let parsed: T =
        serde_json::from_value(args).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
    parsed
        .validate()
        .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
    Ok(parsed)
}
