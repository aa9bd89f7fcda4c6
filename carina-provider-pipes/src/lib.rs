//! Carina Pipes Provider
//!
//! Schema and API mapping for the `source_parameters` block of a pipe.
//!
//! A pipe reads events from exactly one source (an SQS queue, a DynamoDB or
//! Kinesis stream, an ActiveMQ or RabbitMQ broker, or a managed or
//! self-managed Kafka cluster). This crate declares the configuration
//! schema for those sources and converts between the configuration tree
//! and the typed API parameters:
//!
//! - [`schemas`]: attribute declarations, bounds and conflicts
//! - [`config`]: typed views of the configuration tree
//! - [`model`]: API request/response objects
//! - [`source_parameters`]: expand (configuration to API) and flatten (API to configuration)
//! - [`validation`]: schema errors rendered as path-addressed diagnostics

pub mod config;
pub mod model;
pub mod schemas;
pub mod source_parameters;
pub mod utils;
pub mod validation;

pub use config::SourceParametersConfig;
pub use model::{PipeSourceParameters, UpdatePipeSourceParameters};
pub use source_parameters::{
    expand_source_parameters, expand_source_parameters_node, expand_update_source_parameters,
    flatten_source_parameters, flatten_source_parameters_node,
};
pub use validation::{ValidationError, validate_pipe};
