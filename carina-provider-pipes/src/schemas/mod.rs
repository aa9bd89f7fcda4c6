//! Pipes resource schema definitions

pub mod source_parameters;
pub mod types;

use carina_core::schema::ResourceSchema;

/// Returns the schema for pipes
pub fn pipe_schema() -> ResourceSchema {
    ResourceSchema::new("pipes.pipe")
        .with_description("A pipe connecting an event source to a target")
        .attribute(source_parameters::source_parameters())
}

/// Returns all Pipes schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![pipe_schema()]
}

/// Attributes of a source variant whose change replaces the pipe.
/// Empty for unknown variants.
pub fn force_new_attributes(variant: &str) -> Vec<String> {
    let source = source_parameters::source_parameters();
    source
        .block()
        .and_then(|block| block.attributes.get(variant))
        .and_then(|attr| attr.block())
        .map(|block| {
            block
                .attributes
                .values()
                .filter(|attr| attr.force_new)
                .map(|attr| attr.name.clone())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        DeadLetterConfig, KinesisStreamStartPosition, OnPartialBatchItemFailureStreams,
        PipeSourceKinesisStreamParameters, PipeSourceParameters,
        PipeSourceSelfManagedKafkaParameters, SelfManagedKafkaAccessConfigurationVpc,
        SelfManagedKafkaStartPosition,
    };
    use carina_core::resource::Value;
    use std::collections::HashMap;

    fn node(entries: Vec<(&str, Value)>) -> HashMap<String, Value> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn pipe(source: HashMap<String, Value>) -> HashMap<String, Value> {
        node(vec![("source_parameters", Value::block(source))])
    }

    fn sqs(batch_size: i64) -> HashMap<String, Value> {
        pipe(node(vec![(
            "sqs_queue_parameters",
            Value::block(node(vec![("batch_size", Value::Int(batch_size))])),
        )]))
    }

    fn filters(count: usize) -> HashMap<String, Value> {
        let filter = (0..count)
            .map(|i| Value::Map(node(vec![("pattern", Value::String(format!("{{\"n\":[{}]}}", i)))])))
            .collect();
        pipe(node(vec![(
            "filter_criteria",
            Value::block(node(vec![("filter", Value::List(filter))])),
        )]))
    }

    #[test]
    fn all_schemas_lists_the_pipe() {
        let schemas = all_schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].resource_type, "pipes.pipe");
        assert!(schemas[0].attributes().contains_key("source_parameters"));
    }

    #[test]
    fn batch_size_bounds_are_enforced() {
        let schema = pipe_schema();
        assert!(schema.validate(&sqs(1)).is_ok());
        assert!(schema.validate(&sqs(10_000)).is_ok());
        assert!(schema.validate(&sqs(0)).is_err());
        assert!(schema.validate(&sqs(10_001)).is_err());
        assert!(schema.validate(&sqs(-2)).is_err());
    }

    #[test]
    fn five_filters_accepted_sixth_rejected() {
        let schema = pipe_schema();
        assert!(schema.validate(&filters(5)).is_ok());
        assert!(schema.validate(&filters(6)).is_err());
    }

    #[test]
    fn empty_filter_pattern_rejected() {
        let attrs = pipe(node(vec![(
            "filter_criteria",
            Value::block(node(vec![(
                "filter",
                Value::List(vec![Value::Map(node(vec![("pattern", Value::from(""))]))]),
            )])),
        )]));
        assert!(pipe_schema().validate(&attrs).is_err());
    }

    #[test]
    fn source_variants_conflict() {
        let attrs = pipe(node(vec![
            (
                "sqs_queue_parameters",
                Value::block(node(vec![("batch_size", Value::Int(10))])),
            ),
            (
                "managed_streaming_kafka_parameters",
                Value::block(node(vec![("topic_name", Value::from("orders"))])),
            ),
        ]));
        assert!(pipe_schema().validate(&attrs).is_err());
    }

    #[test]
    fn every_variant_conflicts_with_the_other_six() {
        let source = source_parameters::source_parameters();
        let block = source.block().unwrap();
        for name in source_parameters::SOURCE_VARIANTS {
            let attr = &block.attributes[*name];
            assert_eq!(attr.conflicts_with.len(), 6, "{}", name);
            assert!(!attr.conflicts_with.iter().any(|other| other == *name));
            assert_eq!(attr.max_items, Some(1));
        }
        assert!(block.attributes["filter_criteria"].conflicts_with.is_empty());
    }

    #[test]
    fn msk_credentials_exactly_one() {
        let secret = "arn:aws:secretsmanager:us-east-1:123456789012:secret:a-AbCdEf";
        let msk = |credentials: Vec<(&str, Value)>| {
            pipe(node(vec![(
                "managed_streaming_kafka_parameters",
                Value::block(node(vec![
                    ("topic_name", Value::from("orders")),
                    ("credentials", Value::block(node(credentials))),
                ])),
            )]))
        };

        let schema = pipe_schema();
        assert!(
            schema
                .validate(&msk(vec![("sasl_scram_512_auth", Value::from(secret))]))
                .is_ok()
        );
        assert!(
            schema
                .validate(&msk(vec![
                    ("client_certificate_tls_auth", Value::from(secret)),
                    ("sasl_scram_512_auth", Value::from(secret)),
                ]))
                .is_err()
        );
        assert!(schema.validate(&msk(vec![])).is_err());
    }

    #[test]
    fn broker_credentials_are_required() {
        let attrs = pipe(node(vec![(
            "rabbit_mq_broker",
            Value::block(node(vec![("queue", Value::from("jobs"))])),
        )]));
        assert!(pipe_schema().validate(&attrs).is_err());
    }

    #[test]
    fn self_managed_kafka_limits() {
        let kafka = |servers: Vec<&str>, security_groups: usize| {
            let groups = (0..security_groups).map(|i| format!("sg-{}", i));
            pipe(node(vec![(
                "self_managed_kafka",
                Value::block(node(vec![
                    ("topic", Value::from("clicks")),
                    ("servers", Value::string_list(servers)),
                    (
                        "vpc",
                        Value::block(node(vec![("security_groups", Value::string_list(groups))])),
                    ),
                ])),
            )]))
        };

        let schema = pipe_schema();
        assert!(schema.validate(&kafka(vec!["a:9092", "b:9092"], 5)).is_ok());
        assert!(
            schema
                .validate(&kafka(vec!["a:9092", "b:9092", "c:9092"], 1))
                .is_err()
        );
        assert!(schema.validate(&kafka(vec!["a:9092", "a:9092"], 1)).is_err());
        assert!(schema.validate(&kafka(vec!["a:9092"], 6)).is_err());
    }

    #[test]
    fn parallelization_factor_defaults_to_one() {
        let mut attrs = pipe(node(vec![(
            "dynamodb_stream_parameters",
            Value::block(node(vec![("starting_position", Value::from("LATEST"))])),
        )]));
        let schema = pipe_schema();
        schema.apply_defaults(&mut attrs);

        let source = attrs["source_parameters"].as_block().unwrap();
        let stream = source["dynamodb_stream_parameters"].as_block().unwrap();
        assert_eq!(stream.get("parallelization_factor"), Some(&Value::Int(1)));
        assert!(!source.contains_key("kinesis_stream_parameters"));
    }

    #[test]
    fn force_new_attributes_per_variant() {
        assert_eq!(
            force_new_attributes("kinesis_stream_parameters"),
            vec!["starting_position", "starting_position_timestamp"]
        );
        assert_eq!(
            force_new_attributes("self_managed_kafka"),
            vec!["consumer_group_id", "servers", "starting_position", "topic"]
        );
        assert!(force_new_attributes("sqs_queue_parameters").is_empty());
        assert!(force_new_attributes("unknown").is_empty());
    }

    /// Every declared provider name must be a key the API model serializes
    #[test]
    fn provider_names_match_wire_names() {
        let api = PipeSourceParameters {
            kinesis_stream_parameters: Some(PipeSourceKinesisStreamParameters {
                batch_size: Some(1),
                dead_letter_config: Some(DeadLetterConfig {
                    arn: Some("arn".to_string()),
                }),
                maximum_batching_window_in_seconds: Some(1),
                maximum_record_age_in_seconds: Some(1),
                maximum_retry_attempts: Some(1),
                on_partial_batch_item_failure: Some(OnPartialBatchItemFailureStreams::AutomaticBisect),
                parallelization_factor: Some(1),
                starting_position: Some(KinesisStreamStartPosition::Latest),
                starting_position_timestamp: chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").ok(),
            }),
            self_managed_kafka_parameters: Some(PipeSourceSelfManagedKafkaParameters {
                additional_bootstrap_servers: vec!["a:1".to_string()],
                batch_size: Some(1),
                consumer_group_id: Some("g".to_string()),
                credentials: None,
                maximum_batching_window_in_seconds: Some(1),
                server_root_ca_certificate: Some("arn".to_string()),
                starting_position: Some(SelfManagedKafkaStartPosition::Latest),
                topic_name: Some("t".to_string()),
                vpc: Some(SelfManagedKafkaAccessConfigurationVpc::default()),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&api).unwrap();

        let source = source_parameters::source_parameters();
        let block = source.block().unwrap();
        for variant in ["kinesis_stream_parameters", "self_managed_kafka"] {
            let attr = &block.attributes[variant];
            let wire = &json[attr.provider_name.as_deref().unwrap()];
            for child in attr.block().unwrap().attributes.values() {
                if child.name == "credentials" {
                    continue;
                }
                let key = child.provider_name.as_deref().unwrap();
                assert!(wire.get(key).is_some(), "{}.{} -> {}", variant, child.name, key);
            }
        }
    }
}
