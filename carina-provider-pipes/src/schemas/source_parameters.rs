//! Pipe `source_parameters` schema definition

use carina_core::resource::Value;
use carina_core::schema::{AttributeSchema, AttributeType, BlockSchema};

use super::types;

/// The seven mutually exclusive source variants
pub const SOURCE_VARIANTS: &[&str] = &[
    "activemq_broker_parameters",
    "dynamodb_stream_parameters",
    "kinesis_stream_parameters",
    "managed_streaming_kafka_parameters",
    "rabbit_mq_broker",
    "self_managed_kafka",
    "sqs_queue_parameters",
];

fn block(schema: BlockSchema) -> AttributeType {
    AttributeType::Block(Box::new(schema))
}

fn string_set(item: AttributeType) -> AttributeType {
    AttributeType::Set(Box::new(item))
}

/// A variant conflicts with every other variant
fn variant(name: &str, provider_name: &str, schema: BlockSchema) -> AttributeSchema {
    AttributeSchema::new(name, block(schema))
        .with_provider_name(provider_name)
        .with_max_items(1)
        .conflicts_with(SOURCE_VARIANTS.iter().filter(|other| **other != name).copied())
}

fn batch_size() -> AttributeSchema {
    AttributeSchema::new("batch_size", types::batch_size())
        .with_provider_name("BatchSize")
        .with_description("Maximum number of records to include in each batch")
}

fn maximum_batching_window() -> AttributeSchema {
    AttributeSchema::new("maximum_batching_window_in_seconds", types::maximum_batching_window())
        .with_provider_name("MaximumBatchingWindowInSeconds")
        .with_description("Maximum length of time to gather records before invoking the target")
}

fn secret(name: &str, provider_name: &str) -> AttributeSchema {
    AttributeSchema::new(name, types::secrets_manager_arn()).with_provider_name(provider_name)
}

fn basic_auth_credentials() -> AttributeSchema {
    AttributeSchema::new(
        "credentials",
        block(BlockSchema::new().attribute(secret("basic_auth", "BasicAuth").required())),
    )
    .with_provider_name("Credentials")
    .with_max_items(1)
    .required()
    .with_description("Credentials needed to access the broker")
}

fn dead_letter_config() -> AttributeSchema {
    AttributeSchema::new(
        "dead_letter_config",
        block(
            BlockSchema::new().attribute(
                AttributeSchema::new("arn", types::arn())
                    .with_provider_name("Arn")
                    .with_description("ARN of the SQS queue or SNS topic receiving failed records"),
            ),
        ),
    )
    .with_provider_name("DeadLetterConfig")
    .with_max_items(1)
}

/// Attributes shared by the DynamoDB and Kinesis stream sources
fn stream_attributes(starting_position: AttributeType) -> BlockSchema {
    BlockSchema::new()
        .attribute(batch_size())
        .attribute(dead_letter_config())
        .attribute(maximum_batching_window())
        .attribute(
            AttributeSchema::new("maximum_record_age_in_seconds", types::maximum_record_age())
                .with_provider_name("MaximumRecordAgeInSeconds")
                .computed()
                .with_description("Discard records older than this age; -1 keeps them forever"),
        )
        .attribute(
            AttributeSchema::new("maximum_retry_attempts", types::maximum_retry_attempts())
                .with_provider_name("MaximumRetryAttempts")
                .with_description("Discard records after this many retries; -1 retries forever"),
        )
        .attribute(
            AttributeSchema::new(
                "on_partial_batch_item_failure",
                types::on_partial_batch_item_failure(),
            )
            .with_provider_name("OnPartialBatchItemFailure"),
        )
        .attribute(
            AttributeSchema::new("parallelization_factor", types::parallelization_factor())
                .with_provider_name("ParallelizationFactor")
                .with_default(Value::Int(1))
                .with_description("Number of batches to process concurrently from each shard"),
        )
        .attribute(
            AttributeSchema::new("starting_position", starting_position)
                .with_provider_name("StartingPosition")
                .required()
                .force_new(),
        )
}

fn activemq_broker_parameters() -> AttributeSchema {
    variant(
        "activemq_broker_parameters",
        "ActiveMQBrokerParameters",
        BlockSchema::new()
            .with_description("Parameters for using an Active MQ broker as a source")
            .attribute(batch_size())
            .attribute(basic_auth_credentials())
            .attribute(maximum_batching_window())
            .attribute(
                AttributeSchema::new("queue_name", types::broker_queue_name())
                    .with_provider_name("QueueName")
                    .required()
                    .force_new(),
            ),
    )
}

fn dynamodb_stream_parameters() -> AttributeSchema {
    variant(
        "dynamodb_stream_parameters",
        "DynamoDBStreamParameters",
        stream_attributes(types::dynamodb_start_position())
            .with_description("Parameters for using a DynamoDB stream as a source"),
    )
}

fn kinesis_stream_parameters() -> AttributeSchema {
    variant(
        "kinesis_stream_parameters",
        "KinesisStreamParameters",
        stream_attributes(types::kinesis_start_position())
            .with_description("Parameters for using a Kinesis stream as a source")
            .attribute(
                AttributeSchema::new("starting_position_timestamp", types::rfc3339_timestamp())
                    .with_provider_name("StartingPositionTimestamp")
                    .force_new()
                    .with_description("Time from which to start reading, with AT_TIMESTAMP"),
            ),
    )
}

fn managed_streaming_kafka_parameters() -> AttributeSchema {
    variant(
        "managed_streaming_kafka_parameters",
        "ManagedStreamingKafkaParameters",
        BlockSchema::new()
            .with_description("Parameters for using an MSK stream as a source")
            .attribute(batch_size())
            .attribute(
                AttributeSchema::new("consumer_group_id", types::msk_consumer_group_id())
                    .with_provider_name("ConsumerGroupID"),
            )
            .attribute(
                AttributeSchema::new(
                    "credentials",
                    block(
                        BlockSchema::new()
                            .attribute(secret(
                                "client_certificate_tls_auth",
                                "ClientCertificateTlsAuth",
                            ))
                            .attribute(secret("sasl_scram_512_auth", "SaslScram512Auth"))
                            .exactly_one_of(["client_certificate_tls_auth", "sasl_scram_512_auth"]),
                    ),
                )
                .with_provider_name("Credentials")
                .with_max_items(1),
            )
            .attribute(maximum_batching_window())
            .attribute(
                AttributeSchema::new("starting_position", types::msk_start_position())
                    .with_provider_name("StartingPosition")
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("topic_name", types::kafka_topic_name())
                    .with_provider_name("TopicName")
                    .required()
                    .force_new(),
            ),
    )
}

fn rabbit_mq_broker() -> AttributeSchema {
    variant(
        "rabbit_mq_broker",
        "RabbitMQBrokerParameters",
        BlockSchema::new()
            .with_description("Parameters for using a Rabbit MQ broker as a source")
            .attribute(batch_size())
            .attribute(basic_auth_credentials())
            .attribute(maximum_batching_window())
            .attribute(
                AttributeSchema::new("queue", types::broker_queue_name())
                    .with_provider_name("QueueName")
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("virtual_host", types::broker_name())
                    .with_provider_name("VirtualHost")
                    .force_new(),
            ),
    )
}

fn self_managed_kafka() -> AttributeSchema {
    let credentials = BlockSchema::new()
        .attribute(secret("basic_auth", "BasicAuth"))
        .attribute(secret("client_certificate_tls_auth", "ClientCertificateTlsAuth"))
        .attribute(secret("sasl_scram_256_auth", "SaslScram256Auth"))
        .attribute(secret("sasl_scram_512_auth", "SaslScram512Auth"))
        .exactly_one_of([
            "basic_auth",
            "client_certificate_tls_auth",
            "sasl_scram_256_auth",
            "sasl_scram_512_auth",
        ]);

    let vpc = BlockSchema::new()
        .attribute(
            AttributeSchema::new("security_groups", string_set(types::security_group_id()))
                .with_provider_name("SecurityGroup")
                .with_max_items(5),
        )
        .attribute(
            AttributeSchema::new("subnets", string_set(types::subnet_id()))
                .with_provider_name("Subnets")
                .with_max_items(16),
        );

    variant(
        "self_managed_kafka",
        "SelfManagedKafkaParameters",
        BlockSchema::new()
            .with_description("Parameters for using a self-managed Apache Kafka stream as a source")
            .attribute(batch_size())
            .attribute(
                AttributeSchema::new("consumer_group_id", types::broker_name())
                    .with_provider_name("ConsumerGroupID")
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("credentials", block(credentials))
                    .with_provider_name("Credentials")
                    .with_max_items(1),
            )
            .attribute(maximum_batching_window())
            .attribute(
                AttributeSchema::new("server_root_ca_certificate", types::arn())
                    .with_provider_name("ServerRootCaCertificate"),
            )
            .attribute(
                AttributeSchema::new("servers", string_set(types::bootstrap_server()))
                    .with_provider_name("AdditionalBootstrapServers")
                    .with_max_items(2)
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new(
                    "starting_position",
                    types::self_managed_kafka_start_position(),
                )
                .with_provider_name("StartingPosition")
                .force_new(),
            )
            .attribute(
                AttributeSchema::new("topic", types::kafka_topic_name())
                    .with_provider_name("TopicName")
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("vpc", block(vpc))
                    .with_provider_name("Vpc")
                    .with_max_items(1),
            ),
    )
}

fn sqs_queue_parameters() -> AttributeSchema {
    variant(
        "sqs_queue_parameters",
        "SqsQueueParameters",
        BlockSchema::new()
            .with_description("Parameters for using a SQS queue as a source")
            .attribute(batch_size())
            .attribute(maximum_batching_window()),
    )
    .computed()
}

fn filter_criteria() -> AttributeSchema {
    let filter = BlockSchema::new().attribute(
        AttributeSchema::new("pattern", types::filter_pattern())
            .with_provider_name("Pattern")
            .required(),
    );

    AttributeSchema::new(
        "filter_criteria",
        block(
            BlockSchema::new().attribute(
                AttributeSchema::new("filter", block(filter))
                    .with_provider_name("Filters")
                    .with_max_items(5)
                    .required(),
            ),
        ),
    )
    .with_provider_name("FilterCriteria")
    .with_max_items(1)
    .with_description("Criteria selecting which events are forwarded")
}

/// The `source_parameters` block of a pipe
pub fn source_parameters() -> AttributeSchema {
    let schema = BlockSchema::new()
        .attribute(activemq_broker_parameters())
        .attribute(dynamodb_stream_parameters())
        .attribute(filter_criteria())
        .attribute(kinesis_stream_parameters())
        .attribute(managed_streaming_kafka_parameters())
        .attribute(rabbit_mq_broker())
        .attribute(self_managed_kafka())
        .attribute(sqs_queue_parameters());

    AttributeSchema::new("source_parameters", block(schema))
        .with_provider_name("SourceParameters")
        .with_max_items(1)
        .computed()
        .with_description("Parameters required to set up a source for the pipe")
}
