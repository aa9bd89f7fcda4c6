//! Schema - Define type schemas for resources
//!
//! Providers define schemas for each resource type, enabling validation of
//! configuration before it reaches a provider. Nested configuration blocks
//! are described by [`BlockSchema`] and carry their own constraints
//! (maximum item counts, sibling conflicts, exactly-one-of groups).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Unordered collection of unique items
    Set(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
    /// Nested configuration block, encoded as a list of maps
    Block(Box<BlockSchema>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { base, validate, .. }, v) => {
                base.validate(v)?;
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Set(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                    if items[..i].contains(item) {
                        return Err(TypeError::DuplicateItem { index: i });
                    }
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Block(block), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let Value::Map(map) = item else {
                        return Err(TypeError::ListItemError {
                            index: i,
                            inner: Box::new(TypeError::TypeMismatch {
                                expected: "Map".to_string(),
                                got: item.type_name(),
                            }),
                        });
                    };
                    block
                        .validate(map)
                        .map_err(|errors| TypeError::BlockError { index: i, errors })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Set(inner) => format!("Set<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Block(_) => "Block".to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Too many items: at most {max} allowed, got {got}")]
    TooManyItems { max: usize, got: usize },

    #[error("Duplicate item at index {index}")]
    DuplicateItem { index: usize },

    #[error("'{name}' conflicts with '{other}'")]
    ConflictsWith { name: String, other: String },

    #[error("Exactly one of {} must be set, got {got}", names.join(", "))]
    ExactlyOneOf { names: Vec<String>, got: usize },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },

    #[error("Block at index {index}: {}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    BlockError { index: usize, errors: Vec<TypeError> },
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Provider-side property name (e.g., "BatchSize")
    pub provider_name: Option<String>,
    /// Maximum number of items for list, set and block attributes
    pub max_items: Option<usize>,
    /// Sibling attributes that must not be set together with this one
    pub conflicts_with: Vec<String>,
    /// Changing this attribute requires replacing the resource
    pub force_new: bool,
    /// The remote side may fill this attribute in when it is not configured
    pub computed: bool,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            default: None,
            description: None,
            provider_name: None,
            max_items: None,
            conflicts_with: Vec::new(),
            force_new: false,
            computed: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn conflicts_with<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts_with = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Validate a single configured value against this attribute
    pub fn validate_value(&self, value: &Value) -> Result<(), TypeError> {
        if let (Some(max), Value::List(items)) = (self.max_items, value)
            && items.len() > max
        {
            return Err(TypeError::TooManyItems {
                max,
                got: items.len(),
            });
        }
        self.attr_type.validate(value)
    }

    /// Nested block schema, if this attribute is a block
    pub fn block(&self) -> Option<&BlockSchema> {
        match &self.attr_type {
            AttributeType::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// Schema for a nested configuration block
#[derive(Debug, Clone, Default)]
pub struct BlockSchema {
    pub attributes: BTreeMap<String, AttributeSchema>,
    /// Groups of attributes of which exactly one must be set
    pub exactly_one_of: Vec<Vec<String>>,
    pub description: Option<String>,
}

impl BlockSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn exactly_one_of<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exactly_one_of
            .push(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Validate block attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        for (name, schema) in &self.attributes {
            let Some(value) = configured(attributes, name) else {
                if schema.required && schema.default.is_none() {
                    errors.push(TypeError::MissingRequired { name: name.clone() });
                }
                continue;
            };

            if let Err(e) = schema.validate_value(value) {
                errors.push(TypeError::AttributeError {
                    name: name.clone(),
                    inner: Box::new(e),
                });
            }

            for other in &schema.conflicts_with {
                if configured(attributes, other).is_some() {
                    errors.push(TypeError::ConflictsWith {
                        name: name.clone(),
                        other: other.clone(),
                    });
                }
            }
        }
        // Unknown attributes are allowed (for flexibility)

        for group in &self.exactly_one_of {
            let got = group
                .iter()
                .filter(|name| configured(attributes, name).is_some())
                .count();
            if got != 1 {
                errors.push(TypeError::ExactlyOneOf {
                    names: group.clone(),
                    got,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Fill in declared defaults for unset attributes, recursing into
    /// configured nested blocks
    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        for (name, schema) in &self.attributes {
            if configured(attributes, name).is_none() {
                if let Some(default) = &schema.default {
                    attributes.insert(name.clone(), default.clone());
                }
                continue;
            }

            if let Some(block) = schema.block()
                && let Some(Value::List(items)) = attributes.get_mut(name)
            {
                for item in items {
                    if let Value::Map(map) = item {
                        block.apply_defaults(map);
                    }
                }
            }
        }
    }
}

/// A configured (present and non-empty) attribute value
fn configured<'a>(attributes: &'a HashMap<String, Value>, name: &str) -> Option<&'a Value> {
    attributes.get(name).filter(|v| !v.is_empty_block())
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub block: BlockSchema,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            block: BlockSchema::new(),
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.block = self.block.attribute(schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.block = self.block.with_description(desc);
        self
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeSchema> {
        &self.block.attributes
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        self.block.validate(attributes)
    }

    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        self.block.apply_defaults(attributes)
    }
}

/// Building blocks for `AttributeType::Custom` validation functions
pub mod validators {
    use regex::Regex;

    use crate::resource::Value;

    /// Integer within `min..=max`
    pub fn int_between(value: &Value, min: i64, max: i64) -> Result<(), String> {
        match value {
            Value::Int(n) if (min..=max).contains(n) => Ok(()),
            Value::Int(n) => Err(format!("expected value in range {}-{}, got {}", min, max, n)),
            _ => Err("Expected integer".to_string()),
        }
    }

    /// Integer equal to one of `allowed` or within `min..=max`
    pub fn int_in_slice_or_between(
        value: &Value,
        allowed: &[i64],
        min: i64,
        max: i64,
    ) -> Result<(), String> {
        match value {
            Value::Int(n) if allowed.contains(n) || (min..=max).contains(n) => Ok(()),
            Value::Int(n) => {
                let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
                Err(format!(
                    "expected {} or a value in range {}-{}, got {}",
                    allowed.join(", "),
                    min,
                    max,
                    n
                ))
            }
            _ => Err("Expected integer".to_string()),
        }
    }

    /// String whose byte length is within `min..=max`
    pub fn string_len_between(value: &Value, min: usize, max: usize) -> Result<(), String> {
        match value {
            Value::String(s) if (min..=max).contains(&s.len()) => Ok(()),
            Value::String(s) => Err(format!(
                "expected length in range {}-{}, got {}",
                min,
                max,
                s.len()
            )),
            _ => Err("Expected string".to_string()),
        }
    }

    /// String matching `re`
    pub fn string_match(value: &Value, re: &Regex) -> Result<(), String> {
        match value {
            Value::String(s) if re.is_match(s) => Ok(()),
            Value::String(s) => Err(format!("'{}' does not match {}", s, re.as_str())),
            _ => Err("Expected string".to_string()),
        }
    }
}
