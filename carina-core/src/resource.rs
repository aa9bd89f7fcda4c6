//! Resource - Generic configuration values
//!
//! Declarative input arrives as a tree of [`Value`]s. Nested configuration
//! blocks are encoded the way the provider framework encodes them: a list
//! holding (at most) one map.

use std::collections::HashMap;

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Wrap a nested node in a single-element list (block encoding)
    pub fn block(map: HashMap<String, Value>) -> Self {
        Value::List(vec![Value::Map(map)])
    }

    /// Build a list of strings
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Unwrap a block: the first element of a list, if it is a map.
    /// A bare map is accepted as well.
    pub fn as_block(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::List(items) => items.first().and_then(Value::as_map),
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// True for an empty list, which the framework treats as "not configured"
    pub fn is_empty_block(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    pub(crate) fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
