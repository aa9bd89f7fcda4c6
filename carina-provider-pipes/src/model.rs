//! Typed request/response objects of the Pipes API
//!
//! Field names on the wire follow the service's PascalCase convention.
//! Union members (credentials) are tagged enums: exactly one member is
//! ever populated.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Defines a string-valued API enum. Values the service adds later
/// deserialize into `Unknown` instead of failing.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            /// Values known to this crate
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Unknown(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($value => Self::$variant,)+
                    other => Self::Unknown(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Where a DynamoDB stream source starts reading
    DynamoDbStreamStartPosition {
        TrimHorizon => "TRIM_HORIZON",
        Latest => "LATEST",
    }
);

string_enum!(
    /// Where a Kinesis stream source starts reading
    KinesisStreamStartPosition {
        TrimHorizon => "TRIM_HORIZON",
        Latest => "LATEST",
        AtTimestamp => "AT_TIMESTAMP",
    }
);

string_enum!(
    /// Where a managed Kafka source starts reading
    MskStartPosition {
        TrimHorizon => "TRIM_HORIZON",
        Latest => "LATEST",
    }
);

string_enum!(
    /// Where a self-managed Kafka source starts reading
    SelfManagedKafkaStartPosition {
        TrimHorizon => "TRIM_HORIZON",
        Latest => "LATEST",
    }
);

string_enum!(
    /// How a stream source reacts to a partially failed batch
    OnPartialBatchItemFailureStreams {
        AutomaticBisect => "AUTOMATIC_BISECT",
    }
);

// =============================================================================
// Credentials
// =============================================================================

/// Credentials for ActiveMQ and RabbitMQ brokers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MqBrokerAccessCredentials {
    /// Secrets Manager ARN holding a username/password pair
    BasicAuth(String),
}

/// Credentials for managed Kafka clusters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MskAccessCredentials {
    ClientCertificateTlsAuth(String),
    SaslScram512Auth(String),
}

/// Credentials for self-managed Kafka clusters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfManagedKafkaAccessConfigurationCredentials {
    BasicAuth(String),
    ClientCertificateTlsAuth(String),
    SaslScram256Auth(String),
    SaslScram512Auth(String),
}

// =============================================================================
// Shared shapes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeadLetterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelfManagedKafkaAccessConfigurationVpc {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<String>,
}

// =============================================================================
// Source parameters (create / describe)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceActiveMqBrokerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MqBrokerAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceDynamoDbStreamParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_record_age_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_partial_batch_item_failure: Option<OnPartialBatchItemFailureStreams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelization_factor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<DynamoDbStreamStartPosition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceKinesisStreamParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_record_age_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_partial_batch_item_failure: Option<OnPartialBatchItemFailureStreams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelization_factor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<KinesisStreamStartPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_position_timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceManagedStreamingKafkaParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(rename = "ConsumerGroupID", skip_serializing_if = "Option::is_none")]
    pub consumer_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MskAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<MskStartPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceRabbitMqBrokerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MqBrokerAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_host: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceSelfManagedKafkaParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_bootstrap_servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(rename = "ConsumerGroupID", skip_serializing_if = "Option::is_none")]
    pub consumer_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<SelfManagedKafkaAccessConfigurationCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_root_ca_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_position: Option<SelfManagedKafkaStartPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<SelfManagedKafkaAccessConfigurationVpc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipeSourceSqsQueueParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
}

/// Source parameters of a pipe. At most one of the source variants is
/// populated; the filter criteria apply to every variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeSourceParameters {
    #[serde(
        rename = "ActiveMQBrokerParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_mq_broker_parameters: Option<PipeSourceActiveMqBrokerParameters>,
    #[serde(
        rename = "DynamoDBStreamParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamo_db_stream_parameters: Option<PipeSourceDynamoDbStreamParameters>,
    #[serde(rename = "FilterCriteria", skip_serializing_if = "Option::is_none")]
    pub filter_criteria: Option<FilterCriteria>,
    #[serde(
        rename = "KinesisStreamParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub kinesis_stream_parameters: Option<PipeSourceKinesisStreamParameters>,
    #[serde(
        rename = "ManagedStreamingKafkaParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub managed_streaming_kafka_parameters: Option<PipeSourceManagedStreamingKafkaParameters>,
    #[serde(
        rename = "RabbitMQBrokerParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub rabbit_mq_broker_parameters: Option<PipeSourceRabbitMqBrokerParameters>,
    #[serde(
        rename = "SelfManagedKafkaParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub self_managed_kafka_parameters: Option<PipeSourceSelfManagedKafkaParameters>,
    #[serde(rename = "SqsQueueParameters", skip_serializing_if = "Option::is_none")]
    pub sqs_queue_parameters: Option<PipeSourceSqsQueueParameters>,
}

// =============================================================================
// Source parameters (update)
//
// Fields that force replacement of the pipe are not part of these shapes.
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceActiveMqBrokerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MqBrokerAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceDynamoDbStreamParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_record_age_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_partial_batch_item_failure: Option<OnPartialBatchItemFailureStreams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelization_factor: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceKinesisStreamParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_config: Option<DeadLetterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_record_age_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_retry_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_partial_batch_item_failure: Option<OnPartialBatchItemFailureStreams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelization_factor: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceManagedStreamingKafkaParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MskAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceRabbitMqBrokerParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<MqBrokerAccessCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceSelfManagedKafkaParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<SelfManagedKafkaAccessConfigurationCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_root_ca_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<SelfManagedKafkaAccessConfigurationVpc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdatePipeSourceSqsQueueParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_batching_window_in_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePipeSourceParameters {
    #[serde(
        rename = "ActiveMQBrokerParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_mq_broker_parameters: Option<UpdatePipeSourceActiveMqBrokerParameters>,
    #[serde(
        rename = "DynamoDBStreamParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamo_db_stream_parameters: Option<UpdatePipeSourceDynamoDbStreamParameters>,
    #[serde(rename = "FilterCriteria", skip_serializing_if = "Option::is_none")]
    pub filter_criteria: Option<FilterCriteria>,
    #[serde(
        rename = "KinesisStreamParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub kinesis_stream_parameters: Option<UpdatePipeSourceKinesisStreamParameters>,
    #[serde(
        rename = "ManagedStreamingKafkaParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub managed_streaming_kafka_parameters: Option<UpdatePipeSourceManagedStreamingKafkaParameters>,
    #[serde(
        rename = "RabbitMQBrokerParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub rabbit_mq_broker_parameters: Option<UpdatePipeSourceRabbitMqBrokerParameters>,
    #[serde(
        rename = "SelfManagedKafkaParameters",
        skip_serializing_if = "Option::is_none"
    )]
    pub self_managed_kafka_parameters: Option<UpdatePipeSourceSelfManagedKafkaParameters>,
    #[serde(rename = "SqsQueueParameters", skip_serializing_if = "Option::is_none")]
    pub sqs_queue_parameters: Option<UpdatePipeSourceSqsQueueParameters>,
}
