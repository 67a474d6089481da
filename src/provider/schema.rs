//! Schema normalization for strict structured output.

use serde_json::Value;

/// Add `additionalProperties: false` to every object schema that does not
/// declare it. Strict-mode providers reject open objects.
pub fn close_object_schemas(schema: &Value) -> Value {
    match schema {
        Value::Object(obj) => {
            let mut normalized = serde_json::Map::new();
            for (key, value) in obj {
                let next = match key.as_str() {
                    "properties" => close_properties(value),
                    _ => close_object_schemas(value),
                };
                normalized.insert(key.clone(), next);
            }
            if is_object_schema(schema) {
                normalized
                    .entry("additionalProperties")
                    .or_insert(Value::Bool(false));
            }
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.iter().map(close_object_schemas).collect()),
        _ => schema.clone(),
    }
}

// Property names are user-chosen keys, not schema keywords, so each value is
// normalized as a schema in its own right.
fn close_properties(properties: &Value) -> Value {
    match properties {
        Value::Object(props) => Value::Object(
            props
                .iter()
                .map(|(name, prop)| (name.clone(), close_object_schemas(prop)))
                .collect(),
        ),
        other => close_object_schemas(other),
    }
}

fn is_object_schema(value: &Value) -> bool {
    matches!(value.get("type"), Some(Value::String(t)) if t == "object")
}
