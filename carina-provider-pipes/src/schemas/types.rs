//! Pipes-specific type definitions

use std::sync::LazyLock;

use carina_core::resource::Value;
use carina_core::schema::AttributeType;
use carina_core::schema::validators::{
    int_between, int_in_slice_or_between, string_len_between, string_match,
};
use regex::Regex;

use crate::model::{
    DynamoDbStreamStartPosition, KinesisStreamStartPosition, MskStartPosition,
    OnPartialBatchItemFailureStreams, SelfManagedKafkaStartPosition,
};

static SECRETS_MANAGER_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^arn:aws([a-z]|\-)*:secretsmanager:([a-z]{2}((-gov)|(-iso(b?)))?-[a-z]+-\d{1}):(\d{12}):secret:.+$",
    )
    .expect("valid regex")
});

static KAFKA_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^.]([a-zA-Z0-9\-_.]+)$").expect("valid regex"));

static BROKER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-/*:_+=.@]*$").expect("valid regex"));

static BOOTSTRAP_SERVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)*([A-Za-z0-9]|[A-Za-z0-9][A-Za-z0-9\-]*[A-Za-z0-9]):[0-9]{1,5}$",
    )
    .expect("valid regex")
});

static SECURITY_GROUP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sg-[0-9a-zA-Z]*$").expect("valid regex"));

static SUBNET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^subnet-[0-9a-z]*$").expect("valid regex"));

static ACCOUNT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(aws|\d{12})?$").expect("valid regex"));

fn enum_of(values: &[&str]) -> AttributeType {
    AttributeType::Enum(values.iter().map(ToString::to_string).collect())
}

// =============================================================================
// Numeric bounds
// =============================================================================

/// Records per batch
pub fn batch_size() -> AttributeType {
    AttributeType::Custom {
        name: "BatchSize".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| int_between(value, 1, 10_000),
    }
}

pub fn maximum_batching_window() -> AttributeType {
    AttributeType::Custom {
        name: "MaximumBatchingWindowInSeconds".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| int_between(value, 0, 300),
    }
}

/// `-1` (infinite) or 60 seconds to 7 days
pub fn maximum_record_age() -> AttributeType {
    AttributeType::Custom {
        name: "MaximumRecordAgeInSeconds".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| int_in_slice_or_between(value, &[-1], 60, 604_800),
    }
}

/// `-1` retries forever
pub fn maximum_retry_attempts() -> AttributeType {
    AttributeType::Custom {
        name: "MaximumRetryAttempts".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| int_between(value, -1, 10_000),
    }
}

pub fn parallelization_factor() -> AttributeType {
    AttributeType::Custom {
        name: "ParallelizationFactor".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| int_between(value, 1, 10),
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// ARN of a Secrets Manager secret holding broker credentials
pub fn secrets_manager_arn() -> AttributeType {
    AttributeType::Custom {
        name: "SecretsManagerArn".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_match(value, &SECRETS_MANAGER_ARN)
                .map_err(|_| format!("Invalid Secrets Manager secret ARN: {:?}", value))
        },
    }
}

/// Any ARN: `arn:<partition>:<service>:<region>:<account>:<resource>`
pub fn arn() -> AttributeType {
    AttributeType::Custom {
        name: "Arn".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value {
            Value::String(s) => validate_arn(s),
            _ => Err("Expected string".to_string()),
        },
    }
}

fn validate_arn(s: &str) -> Result<(), String> {
    let parts: Vec<&str> = s.splitn(6, ':').collect();
    let [prefix, partition, service, _region, account, resource] = parts[..] else {
        return Err(format!("Invalid ARN '{}': expected 6 ':'-separated parts", s));
    };
    if prefix != "arn" {
        return Err(format!("Invalid ARN '{}': must start with 'arn:'", s));
    }
    if partition.is_empty() || service.is_empty() || resource.is_empty() {
        return Err(format!(
            "Invalid ARN '{}': partition, service and resource are required",
            s
        ));
    }
    if !ACCOUNT_ID.is_match(account) {
        return Err(format!("Invalid ARN '{}': invalid account ID '{}'", s, account));
    }
    Ok(())
}

/// ActiveMQ queue or RabbitMQ queue name
pub fn broker_queue_name() -> AttributeType {
    AttributeType::Custom {
        name: "QueueName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| string_len_between(value, 1, 1000),
    }
}

/// Kafka topic name on a managed or self-managed cluster
pub fn kafka_topic_name() -> AttributeType {
    AttributeType::Custom {
        name: "TopicName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 249)?;
            string_match(value, &KAFKA_NAME)
        },
    }
}

pub fn msk_consumer_group_id() -> AttributeType {
    AttributeType::Custom {
        name: "ConsumerGroupId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 200)?;
            string_match(value, &KAFKA_NAME)
        },
    }
}

/// Self-managed Kafka consumer group and RabbitMQ virtual host
pub fn broker_name() -> AttributeType {
    AttributeType::Custom {
        name: "BrokerName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 200)?;
            string_match(value, &BROKER_NAME)
        },
    }
}

/// `host:port` of a Kafka bootstrap server
pub fn bootstrap_server() -> AttributeType {
    AttributeType::Custom {
        name: "BootstrapServer".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 300)?;
            string_match(value, &BOOTSTRAP_SERVER)
        },
    }
}

pub fn security_group_id() -> AttributeType {
    AttributeType::Custom {
        name: "SecurityGroupId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 1024)?;
            string_match(value, &SECURITY_GROUP_ID)
        },
    }
}

pub fn subnet_id() -> AttributeType {
    AttributeType::Custom {
        name: "SubnetId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            string_len_between(value, 1, 1024)?;
            string_match(value, &SUBNET_ID)
        },
    }
}

/// Event filter pattern (JSON text)
pub fn filter_pattern() -> AttributeType {
    AttributeType::Custom {
        name: "FilterPattern".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| string_len_between(value, 1, 4096),
    }
}

/// RFC 3339 timestamp, e.g. `2024-03-01T12:30:00Z`
pub fn rfc3339_timestamp() -> AttributeType {
    AttributeType::Custom {
        name: "Rfc3339Timestamp".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value {
            Value::String(s) => chrono::DateTime::parse_from_rfc3339(s)
                .map(|_| ())
                .map_err(|e| format!("'{}' is not a valid RFC 3339 timestamp: {}", s, e)),
            _ => Err("Expected string".to_string()),
        },
    }
}

// =============================================================================
// Enums
// =============================================================================

pub fn dynamodb_start_position() -> AttributeType {
    enum_of(DynamoDbStreamStartPosition::VALUES)
}

pub fn kinesis_start_position() -> AttributeType {
    enum_of(KinesisStreamStartPosition::VALUES)
}

pub fn msk_start_position() -> AttributeType {
    enum_of(MskStartPosition::VALUES)
}

pub fn self_managed_kafka_start_position() -> AttributeType {
    enum_of(SelfManagedKafkaStartPosition::VALUES)
}

pub fn on_partial_batch_item_failure() -> AttributeType {
    enum_of(OnPartialBatchItemFailureStreams::VALUES)
}
