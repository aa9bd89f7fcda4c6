//! Validation of pipe attributes
//!
//! Schema errors are nested (attribute, block item, attribute, ...). They
//! are flattened here into one diagnostic per failure, addressed by a
//! dotted path such as `source_parameters.0.sqs_queue_parameters.0.batch_size`.

use std::collections::HashMap;

use carina_core::resource::Value;
use carina_core::schema::TypeError;

use crate::schemas::pipe_schema;

/// Validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate pipe attributes against the pipe schema
pub fn validate_pipe(attributes: &HashMap<String, Value>) -> ValidationResult {
    let errors = match pipe_schema().validate(attributes) {
        Ok(()) => return Ok(()),
        Err(errors) => errors,
    };

    let mut out = Vec::new();
    for error in &errors {
        collect(error, "", &mut out);
    }
    Err(out)
}

/// Validate a resource based on its type
pub fn validate_resource(
    resource_type: &str,
    attributes: &HashMap<String, Value>,
) -> ValidationResult {
    match resource_type {
        "pipes.pipe" => validate_pipe(attributes),
        _ => Ok(()), // Unknown types pass validation
    }
}

fn join(prefix: &str, segment: impl std::fmt::Display) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

fn collect(error: &TypeError, path: &str, out: &mut Vec<ValidationError>) {
    match error {
        TypeError::AttributeError { name, inner } => collect(inner, &join(path, name), out),
        TypeError::ListItemError { index, inner } => collect(inner, &join(path, index), out),
        TypeError::MapValueError { key, inner } => collect(inner, &join(path, key), out),
        TypeError::BlockError { index, errors } => {
            let path = join(path, index);
            for inner in errors {
                collect(inner, &path, out);
            }
        }
        TypeError::MissingRequired { name } => out.push(ValidationError {
            path: join(path, name),
            message: "required attribute is missing".to_string(),
        }),
        TypeError::ConflictsWith { name, other } => out.push(ValidationError {
            path: join(path, name),
            message: format!("conflicts with {}", join(path, other)),
        }),
        other => out.push(ValidationError {
            path: path.to_string(),
            message: other.to_string(),
        }),
    }
}
