//! Conversion between the `source_parameters` configuration block and the
//! API's `PipeSourceParameters`
//!
//! Expansion leaves zero values (`0`, `""`, empty lists) unset so the
//! service applies its own defaults. Flattening reports only what the
//! service returned.

use std::collections::HashMap;

use carina_core::resource::Value;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use log::{debug, warn};

use crate::config::{
    ActiveMqBrokerConfig, BasicAuthCredentialsConfig, ConfigBlock, DeadLetterConfigBlock,
    DynamoDbStreamConfig, FilterConfig, FilterCriteriaConfig, KinesisStreamConfig,
    ManagedStreamingKafkaConfig, MskCredentialsConfig, RabbitMqBrokerConfig,
    SelfManagedKafkaConfig, SelfManagedKafkaCredentialsConfig, SourceParametersConfig,
    SqsQueueConfig, StreamConfig, VpcConfig,
};
use crate::model::{
    DeadLetterConfig, DynamoDbStreamStartPosition, Filter, FilterCriteria,
    KinesisStreamStartPosition, MqBrokerAccessCredentials, MskAccessCredentials, MskStartPosition,
    OnPartialBatchItemFailureStreams, PipeSourceActiveMqBrokerParameters,
    PipeSourceDynamoDbStreamParameters, PipeSourceKinesisStreamParameters,
    PipeSourceManagedStreamingKafkaParameters, PipeSourceParameters,
    PipeSourceRabbitMqBrokerParameters, PipeSourceSelfManagedKafkaParameters,
    PipeSourceSqsQueueParameters, SelfManagedKafkaAccessConfigurationCredentials,
    SelfManagedKafkaAccessConfigurationVpc, SelfManagedKafkaStartPosition,
    UpdatePipeSourceActiveMqBrokerParameters, UpdatePipeSourceDynamoDbStreamParameters,
    UpdatePipeSourceKinesisStreamParameters, UpdatePipeSourceManagedStreamingKafkaParameters,
    UpdatePipeSourceParameters, UpdatePipeSourceRabbitMqBrokerParameters,
    UpdatePipeSourceSelfManagedKafkaParameters, UpdatePipeSourceSqsQueueParameters,
};

// =============================================================================
// Field guards
// =============================================================================

fn non_zero_int(value: Option<i64>) -> Option<i32> {
    let n = value.filter(|n| *n != 0)?;
    match i32::try_from(n) {
        Ok(n) => Some(n),
        Err(_) => {
            debug!("dropping integer {} outside the 32-bit range", n);
            None
        }
    }
}

/// A zero window is the service default and is not reported back
fn flatten_batching_window(value: Option<i32>) -> Option<i64> {
    value.filter(|n| *n != 0).map(i64::from)
}

fn non_empty_string(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn non_empty_enum<T: for<'a> From<&'a str>>(value: &Option<String>) -> Option<T> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(T::from)
}

/// Parse an RFC 3339 timestamp. Malformed input yields the Unix epoch
/// rather than an error; the schema rejects it before expansion.
pub fn expand_timestamp(value: &Option<String>) -> Option<DateTime<FixedOffset>> {
    let raw = value.as_deref().filter(|s| !s.is_empty())?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!("invalid RFC 3339 timestamp '{}' ({}), using zero time", raw, e);
            Some(DateTime::<FixedOffset>::from(DateTime::<Utc>::default()))
        }
    }
}

pub fn flatten_timestamp(value: Option<&DateTime<FixedOffset>>) -> Option<String> {
    value.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// First non-empty member in declaration order. Later members are dropped.
fn first_credential<T>(members: &[(&str, &Option<String>, fn(String) -> T)]) -> Option<T> {
    let mut selected: Option<(&str, T)> = None;
    for &(name, value, wrap) in members {
        let Some(value) = non_empty_string(value) else {
            continue;
        };
        if let Some((chosen, _)) = &selected {
            debug!("ignoring credential '{}', '{}' is already set", name, chosen);
            continue;
        }
        selected = Some((name, wrap(value)));
    }
    selected.map(|(_, credential)| credential)
}

// =============================================================================
// Shared shapes
// =============================================================================

pub fn expand_dead_letter_config(config: &DeadLetterConfigBlock) -> DeadLetterConfig {
    DeadLetterConfig {
        arn: non_empty_string(&config.arn),
    }
}

pub fn flatten_dead_letter_config(api: Option<&DeadLetterConfig>) -> Option<DeadLetterConfigBlock> {
    let api = api?;
    Some(DeadLetterConfigBlock {
        arn: api.arn.clone(),
    })
}

pub fn expand_filter_criteria(config: &FilterCriteriaConfig) -> FilterCriteria {
    FilterCriteria {
        filters: config
            .filters
            .iter()
            .filter_map(|f| non_empty_string(&f.pattern))
            .map(|pattern| Filter {
                pattern: Some(pattern),
            })
            .collect(),
    }
}

pub fn flatten_filter_criteria(api: Option<&FilterCriteria>) -> Option<FilterCriteriaConfig> {
    let api = api?;
    Some(FilterCriteriaConfig {
        filters: api
            .filters
            .iter()
            .filter_map(|f| f.pattern.clone())
            .map(|pattern| FilterConfig {
                pattern: Some(pattern),
            })
            .collect(),
    })
}

pub fn expand_mq_broker_credentials(
    config: &BasicAuthCredentialsConfig,
) -> Option<MqBrokerAccessCredentials> {
    first_credential(&[(
        "basic_auth",
        &config.basic_auth,
        MqBrokerAccessCredentials::BasicAuth,
    )])
}

pub fn flatten_mq_broker_credentials(
    api: Option<&MqBrokerAccessCredentials>,
) -> Option<BasicAuthCredentialsConfig> {
    match api? {
        MqBrokerAccessCredentials::BasicAuth(arn) => Some(BasicAuthCredentialsConfig {
            basic_auth: Some(arn.clone()),
        }),
    }
}

pub fn expand_msk_credentials(config: &MskCredentialsConfig) -> Option<MskAccessCredentials> {
    first_credential(&[
        (
            "client_certificate_tls_auth",
            &config.client_certificate_tls_auth,
            MskAccessCredentials::ClientCertificateTlsAuth,
        ),
        (
            "sasl_scram_512_auth",
            &config.sasl_scram_512_auth,
            MskAccessCredentials::SaslScram512Auth,
        ),
    ])
}

pub fn flatten_msk_credentials(api: Option<&MskAccessCredentials>) -> Option<MskCredentialsConfig> {
    let mut config = MskCredentialsConfig::default();
    match api? {
        MskAccessCredentials::ClientCertificateTlsAuth(arn) => {
            config.client_certificate_tls_auth = Some(arn.clone())
        }
        MskAccessCredentials::SaslScram512Auth(arn) => {
            config.sasl_scram_512_auth = Some(arn.clone())
        }
    }
    Some(config)
}

pub fn expand_self_managed_kafka_credentials(
    config: &SelfManagedKafkaCredentialsConfig,
) -> Option<SelfManagedKafkaAccessConfigurationCredentials> {
    use SelfManagedKafkaAccessConfigurationCredentials as Credentials;

    first_credential(&[
        ("basic_auth", &config.basic_auth, Credentials::BasicAuth),
        (
            "client_certificate_tls_auth",
            &config.client_certificate_tls_auth,
            Credentials::ClientCertificateTlsAuth,
        ),
        (
            "sasl_scram_256_auth",
            &config.sasl_scram_256_auth,
            Credentials::SaslScram256Auth,
        ),
        (
            "sasl_scram_512_auth",
            &config.sasl_scram_512_auth,
            Credentials::SaslScram512Auth,
        ),
    ])
}

pub fn flatten_self_managed_kafka_credentials(
    api: Option<&SelfManagedKafkaAccessConfigurationCredentials>,
) -> Option<SelfManagedKafkaCredentialsConfig> {
    use SelfManagedKafkaAccessConfigurationCredentials as Credentials;

    let mut config = SelfManagedKafkaCredentialsConfig::default();
    match api? {
        Credentials::BasicAuth(arn) => config.basic_auth = Some(arn.clone()),
        Credentials::ClientCertificateTlsAuth(arn) => {
            config.client_certificate_tls_auth = Some(arn.clone())
        }
        Credentials::SaslScram256Auth(arn) => config.sasl_scram_256_auth = Some(arn.clone()),
        Credentials::SaslScram512Auth(arn) => config.sasl_scram_512_auth = Some(arn.clone()),
    }
    Some(config)
}

pub fn expand_vpc(config: &VpcConfig) -> SelfManagedKafkaAccessConfigurationVpc {
    SelfManagedKafkaAccessConfigurationVpc {
        security_group: config.security_groups.clone(),
        subnets: config.subnets.clone(),
    }
}

pub fn flatten_vpc(api: Option<&SelfManagedKafkaAccessConfigurationVpc>) -> Option<VpcConfig> {
    let api = api?;
    Some(VpcConfig {
        security_groups: api.security_group.clone(),
        subnets: api.subnets.clone(),
    })
}

// =============================================================================
// Source variants
// =============================================================================

pub fn expand_activemq_broker_parameters(
    config: &ActiveMqBrokerConfig,
) -> PipeSourceActiveMqBrokerParameters {
    PipeSourceActiveMqBrokerParameters {
        batch_size: non_zero_int(config.batch_size),
        credentials: config
            .credentials
            .as_ref()
            .and_then(expand_mq_broker_credentials),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
        queue_name: non_empty_string(&config.queue_name),
    }
}

pub fn flatten_activemq_broker_parameters(
    api: Option<&PipeSourceActiveMqBrokerParameters>,
) -> Option<ActiveMqBrokerConfig> {
    let api = api?;
    Some(ActiveMqBrokerConfig {
        batch_size: api.batch_size.map(i64::from),
        credentials: flatten_mq_broker_credentials(api.credentials.as_ref()),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
        queue_name: api.queue_name.clone(),
    })
}

pub fn expand_dynamodb_stream_parameters(
    config: &DynamoDbStreamConfig,
) -> PipeSourceDynamoDbStreamParameters {
    PipeSourceDynamoDbStreamParameters {
        batch_size: non_zero_int(config.batch_size),
        dead_letter_config: config
            .dead_letter_config
            .as_ref()
            .map(expand_dead_letter_config),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
        maximum_record_age_in_seconds: non_zero_int(config.maximum_record_age_in_seconds),
        maximum_retry_attempts: non_zero_int(config.maximum_retry_attempts),
        on_partial_batch_item_failure: non_empty_enum(&config.on_partial_batch_item_failure),
        parallelization_factor: non_zero_int(config.parallelization_factor),
        starting_position: non_empty_enum::<DynamoDbStreamStartPosition>(
            &config.starting_position,
        ),
    }
}

pub fn flatten_dynamodb_stream_parameters(
    api: Option<&PipeSourceDynamoDbStreamParameters>,
) -> Option<DynamoDbStreamConfig> {
    let api = api?;
    Some(StreamConfig {
        batch_size: api.batch_size.map(i64::from),
        dead_letter_config: flatten_dead_letter_config(api.dead_letter_config.as_ref()),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
        maximum_record_age_in_seconds: api.maximum_record_age_in_seconds.map(i64::from),
        maximum_retry_attempts: api.maximum_retry_attempts.map(i64::from),
        on_partial_batch_item_failure: api
            .on_partial_batch_item_failure
            .as_ref()
            .map(ToString::to_string),
        parallelization_factor: api.parallelization_factor.map(i64::from),
        starting_position: api.starting_position.as_ref().map(ToString::to_string),
    })
}

pub fn expand_kinesis_stream_parameters(
    config: &KinesisStreamConfig,
) -> PipeSourceKinesisStreamParameters {
    let stream = &config.stream;
    PipeSourceKinesisStreamParameters {
        batch_size: non_zero_int(stream.batch_size),
        dead_letter_config: stream
            .dead_letter_config
            .as_ref()
            .map(expand_dead_letter_config),
        maximum_batching_window_in_seconds: non_zero_int(stream.maximum_batching_window_in_seconds),
        maximum_record_age_in_seconds: non_zero_int(stream.maximum_record_age_in_seconds),
        maximum_retry_attempts: non_zero_int(stream.maximum_retry_attempts),
        on_partial_batch_item_failure: non_empty_enum(&stream.on_partial_batch_item_failure),
        parallelization_factor: non_zero_int(stream.parallelization_factor),
        starting_position: non_empty_enum::<KinesisStreamStartPosition>(&stream.starting_position),
        starting_position_timestamp: expand_timestamp(&config.starting_position_timestamp),
    }
}

pub fn flatten_kinesis_stream_parameters(
    api: Option<&PipeSourceKinesisStreamParameters>,
) -> Option<KinesisStreamConfig> {
    let api = api?;
    Some(KinesisStreamConfig {
        stream: StreamConfig {
            batch_size: api.batch_size.map(i64::from),
            dead_letter_config: flatten_dead_letter_config(api.dead_letter_config.as_ref()),
            maximum_batching_window_in_seconds: flatten_batching_window(
                api.maximum_batching_window_in_seconds,
            ),
            maximum_record_age_in_seconds: api.maximum_record_age_in_seconds.map(i64::from),
            maximum_retry_attempts: api.maximum_retry_attempts.map(i64::from),
            on_partial_batch_item_failure: api
                .on_partial_batch_item_failure
                .as_ref()
                .map(ToString::to_string),
            parallelization_factor: api.parallelization_factor.map(i64::from),
            starting_position: api.starting_position.as_ref().map(ToString::to_string),
        },
        starting_position_timestamp: flatten_timestamp(api.starting_position_timestamp.as_ref()),
    })
}

pub fn expand_managed_streaming_kafka_parameters(
    config: &ManagedStreamingKafkaConfig,
) -> PipeSourceManagedStreamingKafkaParameters {
    PipeSourceManagedStreamingKafkaParameters {
        batch_size: non_zero_int(config.batch_size),
        consumer_group_id: non_empty_string(&config.consumer_group_id),
        credentials: config.credentials.as_ref().and_then(expand_msk_credentials),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
        starting_position: non_empty_enum::<MskStartPosition>(&config.starting_position),
        topic_name: non_empty_string(&config.topic_name),
    }
}

pub fn flatten_managed_streaming_kafka_parameters(
    api: Option<&PipeSourceManagedStreamingKafkaParameters>,
) -> Option<ManagedStreamingKafkaConfig> {
    let api = api?;
    Some(ManagedStreamingKafkaConfig {
        batch_size: api.batch_size.map(i64::from),
        consumer_group_id: api.consumer_group_id.clone(),
        credentials: flatten_msk_credentials(api.credentials.as_ref()),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
        starting_position: api.starting_position.as_ref().map(ToString::to_string),
        topic_name: api.topic_name.clone(),
    })
}

pub fn expand_rabbit_mq_broker_parameters(
    config: &RabbitMqBrokerConfig,
) -> PipeSourceRabbitMqBrokerParameters {
    PipeSourceRabbitMqBrokerParameters {
        batch_size: non_zero_int(config.batch_size),
        credentials: config
            .credentials
            .as_ref()
            .and_then(expand_mq_broker_credentials),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
        queue_name: non_empty_string(&config.queue),
        virtual_host: non_empty_string(&config.virtual_host),
    }
}

pub fn flatten_rabbit_mq_broker_parameters(
    api: Option<&PipeSourceRabbitMqBrokerParameters>,
) -> Option<RabbitMqBrokerConfig> {
    let api = api?;
    Some(RabbitMqBrokerConfig {
        batch_size: api.batch_size.map(i64::from),
        credentials: flatten_mq_broker_credentials(api.credentials.as_ref()),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
        queue: api.queue_name.clone(),
        virtual_host: api.virtual_host.clone(),
    })
}

pub fn expand_self_managed_kafka_parameters(
    config: &SelfManagedKafkaConfig,
) -> PipeSourceSelfManagedKafkaParameters {
    PipeSourceSelfManagedKafkaParameters {
        additional_bootstrap_servers: config.servers.clone(),
        batch_size: non_zero_int(config.batch_size),
        consumer_group_id: non_empty_string(&config.consumer_group_id),
        credentials: config
            .credentials
            .as_ref()
            .and_then(expand_self_managed_kafka_credentials),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
        server_root_ca_certificate: non_empty_string(&config.server_root_ca_certificate),
        starting_position: non_empty_enum::<SelfManagedKafkaStartPosition>(
            &config.starting_position,
        ),
        topic_name: non_empty_string(&config.topic),
        vpc: config.vpc.as_ref().map(expand_vpc),
    }
}

pub fn flatten_self_managed_kafka_parameters(
    api: Option<&PipeSourceSelfManagedKafkaParameters>,
) -> Option<SelfManagedKafkaConfig> {
    let api = api?;
    Some(SelfManagedKafkaConfig {
        batch_size: api.batch_size.map(i64::from),
        consumer_group_id: api.consumer_group_id.clone(),
        credentials: flatten_self_managed_kafka_credentials(api.credentials.as_ref()),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
        server_root_ca_certificate: api.server_root_ca_certificate.clone(),
        servers: api.additional_bootstrap_servers.clone(),
        starting_position: api.starting_position.as_ref().map(ToString::to_string),
        topic: api.topic_name.clone(),
        vpc: flatten_vpc(api.vpc.as_ref()),
    })
}

pub fn expand_sqs_queue_parameters(config: &SqsQueueConfig) -> PipeSourceSqsQueueParameters {
    PipeSourceSqsQueueParameters {
        batch_size: non_zero_int(config.batch_size),
        maximum_batching_window_in_seconds: non_zero_int(config.maximum_batching_window_in_seconds),
    }
}

pub fn flatten_sqs_queue_parameters(
    api: Option<&PipeSourceSqsQueueParameters>,
) -> Option<SqsQueueConfig> {
    let api = api?;
    Some(SqsQueueConfig {
        batch_size: api.batch_size.map(i64::from),
        maximum_batching_window_in_seconds: flatten_batching_window(api.maximum_batching_window_in_seconds),
    })
}

// =============================================================================
// Root
// =============================================================================

/// Expand the `source_parameters` block into its create/describe API shape.
/// Co-present variants are all expanded; exclusivity is the schema's job.
pub fn expand_source_parameters(config: &SourceParametersConfig) -> PipeSourceParameters {
    PipeSourceParameters {
        active_mq_broker_parameters: config
            .activemq_broker_parameters
            .as_ref()
            .map(expand_activemq_broker_parameters),
        dynamo_db_stream_parameters: config
            .dynamodb_stream_parameters
            .as_ref()
            .map(expand_dynamodb_stream_parameters),
        filter_criteria: config.filter_criteria.as_ref().map(expand_filter_criteria),
        kinesis_stream_parameters: config
            .kinesis_stream_parameters
            .as_ref()
            .map(expand_kinesis_stream_parameters),
        managed_streaming_kafka_parameters: config
            .managed_streaming_kafka_parameters
            .as_ref()
            .map(expand_managed_streaming_kafka_parameters),
        rabbit_mq_broker_parameters: config
            .rabbit_mq_broker
            .as_ref()
            .map(expand_rabbit_mq_broker_parameters),
        self_managed_kafka_parameters: config
            .self_managed_kafka
            .as_ref()
            .map(expand_self_managed_kafka_parameters),
        sqs_queue_parameters: config
            .sqs_queue_parameters
            .as_ref()
            .map(expand_sqs_queue_parameters),
    }
}

/// Flatten an API object. `None` and objects with nothing set both yield
/// `None`.
pub fn flatten_source_parameters(
    api: Option<&PipeSourceParameters>,
) -> Option<SourceParametersConfig> {
    let api = api?;
    let config = SourceParametersConfig {
        activemq_broker_parameters: flatten_activemq_broker_parameters(
            api.active_mq_broker_parameters.as_ref(),
        ),
        dynamodb_stream_parameters: flatten_dynamodb_stream_parameters(
            api.dynamo_db_stream_parameters.as_ref(),
        ),
        filter_criteria: flatten_filter_criteria(api.filter_criteria.as_ref())
            .filter(|criteria| !criteria.filters.is_empty()),
        kinesis_stream_parameters: flatten_kinesis_stream_parameters(
            api.kinesis_stream_parameters.as_ref(),
        ),
        managed_streaming_kafka_parameters: flatten_managed_streaming_kafka_parameters(
            api.managed_streaming_kafka_parameters.as_ref(),
        ),
        rabbit_mq_broker: flatten_rabbit_mq_broker_parameters(
            api.rabbit_mq_broker_parameters.as_ref(),
        ),
        self_managed_kafka: flatten_self_managed_kafka_parameters(
            api.self_managed_kafka_parameters.as_ref(),
        ),
        sqs_queue_parameters: flatten_sqs_queue_parameters(api.sqs_queue_parameters.as_ref()),
    };

    if config.is_empty() { None } else { Some(config) }
}

/// Expand a `source_parameters` node (single-element list or bare map)
pub fn expand_source_parameters_node(value: &Value) -> Option<PipeSourceParameters> {
    let node = value.as_block()?;
    Some(expand_source_parameters(&SourceParametersConfig::from_value(
        node,
    )))
}

/// Flatten into a `source_parameters` node wrapped as a single-element list
pub fn flatten_source_parameters_node(api: Option<&PipeSourceParameters>) -> Option<Value> {
    flatten_source_parameters(api).map(|config| Value::block(config.to_value()))
}

/// Expand a `source_parameters` node taken from a resource's attributes
pub fn expand_source_parameters_attribute(
    attributes: &HashMap<String, Value>,
) -> Option<PipeSourceParameters> {
    attributes
        .get("source_parameters")
        .and_then(expand_source_parameters_node)
}

// =============================================================================
// Update
// =============================================================================

/// Expand into the update shape, which carries no replacement-forcing fields
pub fn expand_update_source_parameters(
    config: &SourceParametersConfig,
) -> UpdatePipeSourceParameters {
    UpdatePipeSourceParameters {
        active_mq_broker_parameters: config.activemq_broker_parameters.as_ref().map(|c| {
            UpdatePipeSourceActiveMqBrokerParameters {
                batch_size: non_zero_int(c.batch_size),
                credentials: c.credentials.as_ref().and_then(expand_mq_broker_credentials),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
            }
        }),
        dynamo_db_stream_parameters: config
            .dynamodb_stream_parameters
            .as_ref()
            .map(|c| UpdatePipeSourceDynamoDbStreamParameters {
                batch_size: non_zero_int(c.batch_size),
                dead_letter_config: c.dead_letter_config.as_ref().map(expand_dead_letter_config),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
                maximum_record_age_in_seconds: non_zero_int(c.maximum_record_age_in_seconds),
                maximum_retry_attempts: non_zero_int(c.maximum_retry_attempts),
                on_partial_batch_item_failure: non_empty_enum::<OnPartialBatchItemFailureStreams>(
                    &c.on_partial_batch_item_failure,
                ),
                parallelization_factor: non_zero_int(c.parallelization_factor),
            }),
        filter_criteria: config.filter_criteria.as_ref().map(expand_filter_criteria),
        kinesis_stream_parameters: config.kinesis_stream_parameters.as_ref().map(|c| {
            let c = &c.stream;
            UpdatePipeSourceKinesisStreamParameters {
                batch_size: non_zero_int(c.batch_size),
                dead_letter_config: c.dead_letter_config.as_ref().map(expand_dead_letter_config),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
                maximum_record_age_in_seconds: non_zero_int(c.maximum_record_age_in_seconds),
                maximum_retry_attempts: non_zero_int(c.maximum_retry_attempts),
                on_partial_batch_item_failure: non_empty_enum::<OnPartialBatchItemFailureStreams>(
                    &c.on_partial_batch_item_failure,
                ),
                parallelization_factor: non_zero_int(c.parallelization_factor),
            }
        }),
        managed_streaming_kafka_parameters: config
            .managed_streaming_kafka_parameters
            .as_ref()
            .map(|c| UpdatePipeSourceManagedStreamingKafkaParameters {
                batch_size: non_zero_int(c.batch_size),
                credentials: c.credentials.as_ref().and_then(expand_msk_credentials),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
            }),
        rabbit_mq_broker_parameters: config.rabbit_mq_broker.as_ref().map(|c| {
            UpdatePipeSourceRabbitMqBrokerParameters {
                batch_size: non_zero_int(c.batch_size),
                credentials: c.credentials.as_ref().and_then(expand_mq_broker_credentials),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
            }
        }),
        self_managed_kafka_parameters: config.self_managed_kafka.as_ref().map(|c| {
            UpdatePipeSourceSelfManagedKafkaParameters {
                batch_size: non_zero_int(c.batch_size),
                credentials: c
                    .credentials
                    .as_ref()
                    .and_then(expand_self_managed_kafka_credentials),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
                server_root_ca_certificate: non_empty_string(&c.server_root_ca_certificate),
                vpc: c.vpc.as_ref().map(expand_vpc),
            }
        }),
        sqs_queue_parameters: config.sqs_queue_parameters.as_ref().map(|c| {
            UpdatePipeSourceSqsQueueParameters {
                batch_size: non_zero_int(c.batch_size),
                maximum_batching_window_in_seconds: non_zero_int(
                    c.maximum_batching_window_in_seconds,
                ),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "arn:aws:secretsmanager:us-east-1:123456789012:secret:broker-AbCdEf";
    const OTHER_SECRET: &str = "arn:aws:secretsmanager:us-east-1:123456789012:secret:other-AbCdEf";
    const DLQ: &str = "arn:aws:sqs:us-east-1:123456789012:dlq";

    fn round_trip(config: SourceParametersConfig) {
        let api = expand_source_parameters(&config);
        assert_eq!(flatten_source_parameters(Some(&api)), Some(config));
    }

    fn stream_config(starting_position: &str) -> StreamConfig {
        StreamConfig {
            batch_size: Some(100),
            dead_letter_config: Some(DeadLetterConfigBlock {
                arn: Some(DLQ.to_string()),
            }),
            maximum_batching_window_in_seconds: Some(30),
            maximum_record_age_in_seconds: Some(-1),
            maximum_retry_attempts: Some(5),
            on_partial_batch_item_failure: Some("AUTOMATIC_BISECT".to_string()),
            parallelization_factor: Some(2),
            starting_position: Some(starting_position.to_string()),
        }
    }

    #[test]
    fn round_trip_activemq_broker() {
        round_trip(SourceParametersConfig {
            activemq_broker_parameters: Some(ActiveMqBrokerConfig {
                batch_size: Some(10),
                credentials: Some(BasicAuthCredentialsConfig {
                    basic_auth: Some(SECRET.to_string()),
                }),
                maximum_batching_window_in_seconds: Some(60),
                queue_name: Some("orders".to_string()),
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_dynamodb_stream() {
        round_trip(SourceParametersConfig {
            dynamodb_stream_parameters: Some(stream_config("LATEST")),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_kinesis_stream() {
        round_trip(SourceParametersConfig {
            kinesis_stream_parameters: Some(KinesisStreamConfig {
                stream: stream_config("AT_TIMESTAMP"),
                starting_position_timestamp: Some("2024-03-01T12:30:00Z".to_string()),
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_managed_streaming_kafka() {
        round_trip(SourceParametersConfig {
            managed_streaming_kafka_parameters: Some(ManagedStreamingKafkaConfig {
                batch_size: Some(500),
                consumer_group_id: Some("consumers".to_string()),
                credentials: Some(MskCredentialsConfig {
                    client_certificate_tls_auth: Some(SECRET.to_string()),
                    sasl_scram_512_auth: None,
                }),
                maximum_batching_window_in_seconds: Some(1),
                starting_position: Some("TRIM_HORIZON".to_string()),
                topic_name: Some("events".to_string()),
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_rabbit_mq_broker() {
        round_trip(SourceParametersConfig {
            rabbit_mq_broker: Some(RabbitMqBrokerConfig {
                batch_size: Some(20),
                credentials: Some(BasicAuthCredentialsConfig {
                    basic_auth: Some(SECRET.to_string()),
                }),
                maximum_batching_window_in_seconds: Some(300),
                queue: Some("jobs".to_string()),
                virtual_host: Some("/prod".to_string()),
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_self_managed_kafka() {
        round_trip(SourceParametersConfig {
            self_managed_kafka: Some(SelfManagedKafkaConfig {
                batch_size: Some(1),
                consumer_group_id: Some("group-1".to_string()),
                credentials: Some(SelfManagedKafkaCredentialsConfig {
                    sasl_scram_256_auth: Some(SECRET.to_string()),
                    ..Default::default()
                }),
                maximum_batching_window_in_seconds: Some(10),
                server_root_ca_certificate: Some(OTHER_SECRET.to_string()),
                servers: vec!["b-1.example.com:9092".to_string(), "b-2.example.com:9092".to_string()],
                starting_position: Some("LATEST".to_string()),
                topic: Some("clicks".to_string()),
                vpc: Some(VpcConfig {
                    security_groups: vec!["sg-0123".to_string()],
                    subnets: vec!["subnet-a1".to_string(), "subnet-b2".to_string()],
                }),
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_sqs_queue_with_filters() {
        round_trip(SourceParametersConfig {
            sqs_queue_parameters: Some(SqsQueueConfig {
                batch_size: Some(10),
                maximum_batching_window_in_seconds: Some(5),
            }),
            filter_criteria: Some(FilterCriteriaConfig {
                filters: vec![
                    FilterConfig {
                        pattern: Some(r#"{"source":["a"]}"#.to_string()),
                    },
                    FilterConfig {
                        pattern: Some(r#"{"source":["b"]}"#.to_string()),
                    },
                ],
            }),
            ..Default::default()
        });
    }

    #[test]
    fn round_trip_through_generic_node() {
        let node = Value::block(HashMap::from([(
            "sqs_queue_parameters".to_string(),
            Value::block(HashMap::from([
                ("batch_size".to_string(), Value::Int(10)),
                (
                    "maximum_batching_window_in_seconds".to_string(),
                    Value::Int(20),
                ),
            ])),
        )]));

        let api = expand_source_parameters_node(&node).unwrap();
        assert_eq!(
            api.sqs_queue_parameters.as_ref().unwrap().batch_size,
            Some(10)
        );
        assert_eq!(flatten_source_parameters_node(Some(&api)), Some(node));
    }

    #[test]
    fn zero_values_are_left_unset() {
        let config = SourceParametersConfig {
            sqs_queue_parameters: Some(SqsQueueConfig {
                batch_size: Some(0),
                maximum_batching_window_in_seconds: Some(0),
            }),
            ..Default::default()
        };
        let api = expand_source_parameters(&config);
        assert_eq!(
            api.sqs_queue_parameters,
            Some(PipeSourceSqsQueueParameters::default())
        );

        // The zero values do not come back.
        let flattened = flatten_source_parameters(Some(&api)).unwrap();
        assert_eq!(flattened.sqs_queue_parameters, Some(SqsQueueConfig::default()));
        assert_ne!(flattened, config);
    }

    #[test]
    fn empty_strings_and_lists_are_left_unset() {
        let api = expand_self_managed_kafka_parameters(&SelfManagedKafkaConfig {
            consumer_group_id: Some(String::new()),
            starting_position: Some(String::new()),
            topic: Some("t".to_string()),
            ..Default::default()
        });
        assert_eq!(api.consumer_group_id, None);
        assert_eq!(api.starting_position, None);
        assert!(api.additional_bootstrap_servers.is_empty());
        assert_eq!(api.topic_name.as_deref(), Some("t"));
    }

    #[test]
    fn msk_credentials_first_member_wins() {
        let credentials = expand_msk_credentials(&MskCredentialsConfig {
            client_certificate_tls_auth: Some(SECRET.to_string()),
            sasl_scram_512_auth: Some(OTHER_SECRET.to_string()),
        });
        assert_eq!(
            credentials,
            Some(MskAccessCredentials::ClientCertificateTlsAuth(
                SECRET.to_string()
            ))
        );
    }

    #[test]
    fn self_managed_kafka_credentials_follow_declaration_order() {
        let credentials = expand_self_managed_kafka_credentials(&SelfManagedKafkaCredentialsConfig {
            basic_auth: Some(String::new()),
            client_certificate_tls_auth: None,
            sasl_scram_256_auth: Some(SECRET.to_string()),
            sasl_scram_512_auth: Some(OTHER_SECRET.to_string()),
        });
        assert_eq!(
            credentials,
            Some(SelfManagedKafkaAccessConfigurationCredentials::SaslScram256Auth(
                SECRET.to_string()
            ))
        );
    }

    #[test]
    fn empty_credentials_block_expands_to_none() {
        assert_eq!(
            expand_mq_broker_credentials(&BasicAuthCredentialsConfig::default()),
            None
        );
    }

    #[test]
    fn absent_api_objects_flatten_to_none() {
        assert_eq!(flatten_source_parameters(None), None);
        assert_eq!(flatten_activemq_broker_parameters(None), None);
        assert_eq!(flatten_dynamodb_stream_parameters(None), None);
        assert_eq!(flatten_kinesis_stream_parameters(None), None);
        assert_eq!(flatten_managed_streaming_kafka_parameters(None), None);
        assert_eq!(flatten_rabbit_mq_broker_parameters(None), None);
        assert_eq!(flatten_self_managed_kafka_parameters(None), None);
        assert_eq!(flatten_sqs_queue_parameters(None), None);
        assert_eq!(flatten_filter_criteria(None), None);
        assert_eq!(flatten_dead_letter_config(None), None);
        assert_eq!(flatten_source_parameters_node(None), None);
    }

    #[test]
    fn empty_api_object_flattens_to_none() {
        assert_eq!(
            flatten_source_parameters(Some(&PipeSourceParameters::default())),
            None
        );

        let only_empty_filters = PipeSourceParameters {
            filter_criteria: Some(FilterCriteria::default()),
            ..Default::default()
        };
        assert_eq!(flatten_source_parameters(Some(&only_empty_filters)), None);
    }

    #[test]
    fn malformed_timestamp_becomes_zero_time() {
        let api = expand_kinesis_stream_parameters(&KinesisStreamConfig {
            stream: StreamConfig {
                starting_position: Some("AT_TIMESTAMP".to_string()),
                ..Default::default()
            },
            starting_position_timestamp: Some("yesterday at noon".to_string()),
        });

        let ts = api.starting_position_timestamp.unwrap();
        assert_eq!(ts.timestamp(), 0);
        assert_eq!(
            flatten_timestamp(Some(&ts)).as_deref(),
            Some("1970-01-01T00:00:00Z")
        );
    }

    #[test]
    fn timestamp_keeps_offset() {
        let ts = expand_timestamp(&Some("2024-03-01T12:30:00+09:00".to_string())).unwrap();
        assert_eq!(
            flatten_timestamp(Some(&ts)).as_deref(),
            Some("2024-03-01T12:30:00+09:00")
        );
        assert_eq!(expand_timestamp(&Some(String::new())), None);
    }

    #[test]
    fn unknown_enum_values_pass_through() {
        let api = expand_dynamodb_stream_parameters(&StreamConfig {
            starting_position: Some("EARLIEST".to_string()),
            ..Default::default()
        });
        assert_eq!(
            api.starting_position,
            Some(DynamoDbStreamStartPosition::Unknown("EARLIEST".to_string()))
        );
        let flattened = flatten_dynamodb_stream_parameters(Some(&api)).unwrap();
        assert_eq!(flattened.starting_position.as_deref(), Some("EARLIEST"));
    }

    #[test]
    fn co_present_variants_are_all_expanded() {
        let api = expand_source_parameters(&SourceParametersConfig {
            sqs_queue_parameters: Some(SqsQueueConfig {
                batch_size: Some(5),
                ..Default::default()
            }),
            rabbit_mq_broker: Some(RabbitMqBrokerConfig {
                queue: Some("q".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(api.sqs_queue_parameters.is_some());
        assert!(api.rabbit_mq_broker_parameters.is_some());
    }

    #[test]
    fn integers_outside_wire_range_are_dropped() {
        let api = expand_sqs_queue_parameters(&SqsQueueConfig {
            batch_size: Some(i64::from(i32::MAX) + 1),
            maximum_batching_window_in_seconds: Some(-1),
        });
        assert_eq!(api.batch_size, None);
        assert_eq!(api.maximum_batching_window_in_seconds, Some(-1));
    }

    #[test]
    fn update_omits_replacement_fields() {
        let config = SourceParametersConfig {
            kinesis_stream_parameters: Some(KinesisStreamConfig {
                stream: stream_config("AT_TIMESTAMP"),
                starting_position_timestamp: Some("2024-03-01T12:30:00Z".to_string()),
            }),
            filter_criteria: Some(FilterCriteriaConfig {
                filters: vec![FilterConfig {
                    pattern: Some("{}".to_string()),
                }],
            }),
            ..Default::default()
        };

        let update = expand_update_source_parameters(&config);
        let json = serde_json::to_value(&update).unwrap();
        let kinesis = json["KinesisStreamParameters"].as_object().unwrap();

        assert_eq!(kinesis["BatchSize"], 100);
        assert_eq!(kinesis["ParallelizationFactor"], 2);
        assert!(!kinesis.contains_key("StartingPosition"));
        assert!(!kinesis.contains_key("StartingPositionTimestamp"));
        assert_eq!(json["FilterCriteria"]["Filters"][0]["Pattern"], "{}");
    }

    #[test]
    fn update_self_managed_kafka_keeps_mutable_fields() {
        let update = expand_update_source_parameters(&SourceParametersConfig {
            self_managed_kafka: Some(SelfManagedKafkaConfig {
                batch_size: Some(50),
                credentials: Some(SelfManagedKafkaCredentialsConfig {
                    basic_auth: Some(SECRET.to_string()),
                    ..Default::default()
                }),
                server_root_ca_certificate: Some(OTHER_SECRET.to_string()),
                topic: Some("clicks".to_string()),
                servers: vec!["broker:9092".to_string()],
                vpc: Some(VpcConfig {
                    security_groups: vec!["sg-1".to_string()],
                    subnets: vec![],
                }),
                ..Default::default()
            }),
            ..Default::default()
        });

        let kafka = update.self_managed_kafka_parameters.unwrap();
        assert_eq!(kafka.batch_size, Some(50));
        assert_eq!(
            kafka.credentials,
            Some(SelfManagedKafkaAccessConfigurationCredentials::BasicAuth(
                SECRET.to_string()
            ))
        );
        assert_eq!(kafka.server_root_ca_certificate.as_deref(), Some(OTHER_SECRET));
        assert_eq!(kafka.vpc.unwrap().security_group, vec!["sg-1"]);
    }

    fn force_new_wire_names(variant: &str) -> Vec<String> {
        let source = crate::schemas::source_parameters::source_parameters();
        let block = source.block().unwrap().attributes[variant].block().unwrap();
        crate::schemas::force_new_attributes(variant)
            .iter()
            .map(|name| block.attributes[name].provider_name.clone().unwrap())
            .collect()
    }

    #[test]
    fn update_shape_carries_no_force_new_fields() {
        let update = expand_update_source_parameters(&SourceParametersConfig {
            kinesis_stream_parameters: Some(KinesisStreamConfig {
                stream: stream_config("AT_TIMESTAMP"),
                starting_position_timestamp: Some("2024-03-01T12:30:00Z".to_string()),
            }),
            self_managed_kafka: Some(SelfManagedKafkaConfig {
                batch_size: Some(50),
                consumer_group_id: Some("group".to_string()),
                servers: vec!["broker:9092".to_string()],
                starting_position: Some("LATEST".to_string()),
                topic: Some("clicks".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let json = serde_json::to_value(&update).unwrap();

        for (variant, wire) in [
            ("kinesis_stream_parameters", "KinesisStreamParameters"),
            ("self_managed_kafka", "SelfManagedKafkaParameters"),
        ] {
            let params = json[wire].as_object().unwrap();
            assert!(params.contains_key("BatchSize"), "{}", wire);
            let omitted = force_new_wire_names(variant);
            assert!(!omitted.is_empty());
            for key in omitted {
                assert!(!params.contains_key(&key), "{}.{}", wire, key);
            }
        }
    }

    #[test]
    fn filters_without_pattern_are_dropped() {
        let api = expand_filter_criteria(&FilterCriteriaConfig {
            filters: vec![
                FilterConfig { pattern: None },
                FilterConfig {
                    pattern: Some(String::new()),
                },
                FilterConfig {
                    pattern: Some("{}".to_string()),
                },
            ],
        });
        assert_eq!(
            api.filters,
            vec![Filter {
                pattern: Some("{}".to_string()),
            }]
        );

        let flattened = flatten_filter_criteria(Some(&FilterCriteria {
            filters: vec![Filter { pattern: None }],
        }))
        .unwrap();
        assert!(flattened.filters.is_empty());
    }

    #[test]
    fn zero_batching_window_is_not_reported() {
        let sqs = flatten_sqs_queue_parameters(Some(&PipeSourceSqsQueueParameters {
            batch_size: Some(10),
            maximum_batching_window_in_seconds: Some(0),
        }))
        .unwrap();
        assert_eq!(sqs.batch_size, Some(10));
        assert_eq!(sqs.maximum_batching_window_in_seconds, None);

        let kinesis = flatten_kinesis_stream_parameters(Some(&PipeSourceKinesisStreamParameters {
            maximum_batching_window_in_seconds: Some(0),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(kinesis.stream.maximum_batching_window_in_seconds, None);
    }
}
