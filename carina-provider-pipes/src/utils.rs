//! Conversion between JSON documents and configuration values

use std::collections::HashMap;

use carina_core::resource::Value;
use serde_json::json;

/// Convert a JSON value to a configuration value.
/// `null` has no counterpart and yields `None`; it is dropped from
/// arrays and objects. Numbers that are not integers are kept as their
/// string form so that integer attributes reject them.
pub fn json_to_value(value: &serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::String(s) => Some(Value::String(s.clone())),
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Int(i)),
            None => Some(Value::String(n.to_string())),
        },
        serde_json::Value::Array(arr) => {
            let items: Vec<Value> = arr.iter().filter_map(json_to_value).collect();
            Some(Value::List(items))
        }
        serde_json::Value::Object(obj) => {
            let map: HashMap<String, Value> = obj
                .iter()
                .filter_map(|(k, v)| json_to_value(v).map(|v| (k.clone(), v)))
                .collect();
            Some(Value::Map(map))
        }
        serde_json::Value::Null => None,
    }
}

/// Convert a JSON object to an attribute map
pub fn json_to_attributes(value: &serde_json::Value) -> Option<HashMap<String, Value>> {
    match json_to_value(value)? {
        Value::Map(map) => Some(map),
        _ => None,
    }
}

/// Error reading a pipe document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,
}

/// Parse a JSON document into an attribute map
pub fn parse_attributes(text: &str) -> Result<HashMap<String, Value>, DocumentError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    json_to_attributes(&json).ok_or(DocumentError::NotAnObject)
}

/// Convert a configuration value to JSON
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(s),
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::List(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}
