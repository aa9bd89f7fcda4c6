//! Typed views of the `source_parameters` configuration block
//!
//! Each struct decodes one nested node of the generic configuration tree.
//! Decoding is lenient: a field holding a value of the wrong type is
//! treated as unset (schema validation reports it separately).

use std::collections::HashMap;

use carina_core::resource::Value;
use log::debug;

/// A nested configuration block that can be decoded from and re-encoded to
/// a generic node
pub trait ConfigBlock: Sized {
    fn from_value(node: &HashMap<String, Value>) -> Self;

    /// Encode only the fields that are set. Nested blocks are wrapped in
    /// single-element lists.
    fn to_value(&self) -> HashMap<String, Value>;
}

// =============================================================================
// Decoding helpers
// =============================================================================

fn get_string(node: &HashMap<String, Value>, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            debug!("ignoring '{}': expected string, got {:?}", key, other);
            None
        }
    }
}

fn get_int(node: &HashMap<String, Value>, key: &str) -> Option<i64> {
    match node.get(key)? {
        Value::Int(n) => Some(*n),
        other => {
            debug!("ignoring '{}': expected integer, got {:?}", key, other);
            None
        }
    }
}

fn get_strings(node: &HashMap<String, Value>, key: &str) -> Vec<String> {
    let Some(value) = node.get(key) else {
        return Vec::new();
    };
    let Some(items) = value.as_list() else {
        debug!("ignoring '{}': expected list, got {:?}", key, value);
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn get_block<T: ConfigBlock>(node: &HashMap<String, Value>, key: &str) -> Option<T> {
    node.get(key)?.as_block().map(T::from_value)
}

// =============================================================================
// Encoding helpers
// =============================================================================

fn put_string(node: &mut HashMap<String, Value>, key: &str, value: &Option<String>) {
    if let Some(s) = value {
        node.insert(key.to_string(), Value::String(s.clone()));
    }
}

fn put_int(node: &mut HashMap<String, Value>, key: &str, value: Option<i64>) {
    if let Some(n) = value {
        node.insert(key.to_string(), Value::Int(n));
    }
}

fn put_strings(node: &mut HashMap<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        node.insert(key.to_string(), Value::string_list(values.iter().cloned()));
    }
}

fn put_block<T: ConfigBlock>(node: &mut HashMap<String, Value>, key: &str, value: &Option<T>) {
    if let Some(block) = value {
        node.insert(key.to_string(), Value::block(block.to_value()));
    }
}

// =============================================================================
// Shared blocks
// =============================================================================

/// `dead_letter_config` of the stream sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeadLetterConfigBlock {
    pub arn: Option<String>,
}

impl ConfigBlock for DeadLetterConfigBlock {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            arn: get_string(node, "arn"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_string(&mut node, "arn", &self.arn);
        node
    }
}

/// One entry of `filter_criteria.filter`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    pub pattern: Option<String>,
}

impl ConfigBlock for FilterConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            pattern: get_string(node, "pattern"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_string(&mut node, "pattern", &self.pattern);
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteriaConfig {
    pub filters: Vec<FilterConfig>,
}

impl ConfigBlock for FilterCriteriaConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        let filters = node
            .get("filter")
            .and_then(Value::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_map)
                    .map(FilterConfig::from_value)
                    .collect()
            })
            .unwrap_or_default();
        Self { filters }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        if !self.filters.is_empty() {
            let filters = self
                .filters
                .iter()
                .map(|f| Value::Map(f.to_value()))
                .collect();
            node.insert("filter".to_string(), Value::List(filters));
        }
        node
    }
}

/// `credentials` of the ActiveMQ and RabbitMQ sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicAuthCredentialsConfig {
    pub basic_auth: Option<String>,
}

impl ConfigBlock for BasicAuthCredentialsConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            basic_auth: get_string(node, "basic_auth"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_string(&mut node, "basic_auth", &self.basic_auth);
        node
    }
}

/// `credentials` of the managed Kafka source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MskCredentialsConfig {
    pub client_certificate_tls_auth: Option<String>,
    pub sasl_scram_512_auth: Option<String>,
}

impl ConfigBlock for MskCredentialsConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            client_certificate_tls_auth: get_string(node, "client_certificate_tls_auth"),
            sasl_scram_512_auth: get_string(node, "sasl_scram_512_auth"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_string(
            &mut node,
            "client_certificate_tls_auth",
            &self.client_certificate_tls_auth,
        );
        put_string(&mut node, "sasl_scram_512_auth", &self.sasl_scram_512_auth);
        node
    }
}

/// `credentials` of the self-managed Kafka source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfManagedKafkaCredentialsConfig {
    pub basic_auth: Option<String>,
    pub client_certificate_tls_auth: Option<String>,
    pub sasl_scram_256_auth: Option<String>,
    pub sasl_scram_512_auth: Option<String>,
}

impl ConfigBlock for SelfManagedKafkaCredentialsConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            basic_auth: get_string(node, "basic_auth"),
            client_certificate_tls_auth: get_string(node, "client_certificate_tls_auth"),
            sasl_scram_256_auth: get_string(node, "sasl_scram_256_auth"),
            sasl_scram_512_auth: get_string(node, "sasl_scram_512_auth"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_string(&mut node, "basic_auth", &self.basic_auth);
        put_string(
            &mut node,
            "client_certificate_tls_auth",
            &self.client_certificate_tls_auth,
        );
        put_string(&mut node, "sasl_scram_256_auth", &self.sasl_scram_256_auth);
        put_string(&mut node, "sasl_scram_512_auth", &self.sasl_scram_512_auth);
        node
    }
}

/// `vpc` of the self-managed Kafka source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VpcConfig {
    pub security_groups: Vec<String>,
    pub subnets: Vec<String>,
}

impl ConfigBlock for VpcConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            security_groups: get_strings(node, "security_groups"),
            subnets: get_strings(node, "subnets"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_strings(&mut node, "security_groups", &self.security_groups);
        put_strings(&mut node, "subnets", &self.subnets);
        node
    }
}

// =============================================================================
// Source variants
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveMqBrokerConfig {
    pub batch_size: Option<i64>,
    pub credentials: Option<BasicAuthCredentialsConfig>,
    pub maximum_batching_window_in_seconds: Option<i64>,
    pub queue_name: Option<String>,
}

impl ConfigBlock for ActiveMqBrokerConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            credentials: get_block(node, "credentials"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
            queue_name: get_string(node, "queue_name"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_block(&mut node, "credentials", &self.credentials);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        put_string(&mut node, "queue_name", &self.queue_name);
        node
    }
}

/// Fields shared by the DynamoDB and Kinesis stream sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamConfig {
    pub batch_size: Option<i64>,
    pub dead_letter_config: Option<DeadLetterConfigBlock>,
    pub maximum_batching_window_in_seconds: Option<i64>,
    pub maximum_record_age_in_seconds: Option<i64>,
    pub maximum_retry_attempts: Option<i64>,
    pub on_partial_batch_item_failure: Option<String>,
    pub parallelization_factor: Option<i64>,
    pub starting_position: Option<String>,
}

impl ConfigBlock for StreamConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            dead_letter_config: get_block(node, "dead_letter_config"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
            maximum_record_age_in_seconds: get_int(node, "maximum_record_age_in_seconds"),
            maximum_retry_attempts: get_int(node, "maximum_retry_attempts"),
            on_partial_batch_item_failure: get_string(node, "on_partial_batch_item_failure"),
            parallelization_factor: get_int(node, "parallelization_factor"),
            starting_position: get_string(node, "starting_position"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_block(&mut node, "dead_letter_config", &self.dead_letter_config);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        put_int(
            &mut node,
            "maximum_record_age_in_seconds",
            self.maximum_record_age_in_seconds,
        );
        put_int(&mut node, "maximum_retry_attempts", self.maximum_retry_attempts);
        put_string(
            &mut node,
            "on_partial_batch_item_failure",
            &self.on_partial_batch_item_failure,
        );
        put_int(&mut node, "parallelization_factor", self.parallelization_factor);
        put_string(&mut node, "starting_position", &self.starting_position);
        node
    }
}

pub type DynamoDbStreamConfig = StreamConfig;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KinesisStreamConfig {
    pub stream: StreamConfig,
    /// RFC 3339 timestamp, only meaningful with `AT_TIMESTAMP`
    pub starting_position_timestamp: Option<String>,
}

impl ConfigBlock for KinesisStreamConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            stream: StreamConfig::from_value(node),
            starting_position_timestamp: get_string(node, "starting_position_timestamp"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = self.stream.to_value();
        put_string(
            &mut node,
            "starting_position_timestamp",
            &self.starting_position_timestamp,
        );
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagedStreamingKafkaConfig {
    pub batch_size: Option<i64>,
    pub consumer_group_id: Option<String>,
    pub credentials: Option<MskCredentialsConfig>,
    pub maximum_batching_window_in_seconds: Option<i64>,
    pub starting_position: Option<String>,
    pub topic_name: Option<String>,
}

impl ConfigBlock for ManagedStreamingKafkaConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            consumer_group_id: get_string(node, "consumer_group_id"),
            credentials: get_block(node, "credentials"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
            starting_position: get_string(node, "starting_position"),
            topic_name: get_string(node, "topic_name"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_string(&mut node, "consumer_group_id", &self.consumer_group_id);
        put_block(&mut node, "credentials", &self.credentials);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        put_string(&mut node, "starting_position", &self.starting_position);
        put_string(&mut node, "topic_name", &self.topic_name);
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RabbitMqBrokerConfig {
    pub batch_size: Option<i64>,
    pub credentials: Option<BasicAuthCredentialsConfig>,
    pub maximum_batching_window_in_seconds: Option<i64>,
    pub queue: Option<String>,
    pub virtual_host: Option<String>,
}

impl ConfigBlock for RabbitMqBrokerConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            credentials: get_block(node, "credentials"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
            queue: get_string(node, "queue"),
            virtual_host: get_string(node, "virtual_host"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_block(&mut node, "credentials", &self.credentials);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        put_string(&mut node, "queue", &self.queue);
        put_string(&mut node, "virtual_host", &self.virtual_host);
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfManagedKafkaConfig {
    pub batch_size: Option<i64>,
    pub consumer_group_id: Option<String>,
    pub credentials: Option<SelfManagedKafkaCredentialsConfig>,
    pub maximum_batching_window_in_seconds: Option<i64>,
    pub server_root_ca_certificate: Option<String>,
    pub servers: Vec<String>,
    pub starting_position: Option<String>,
    pub topic: Option<String>,
    pub vpc: Option<VpcConfig>,
}

impl ConfigBlock for SelfManagedKafkaConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            consumer_group_id: get_string(node, "consumer_group_id"),
            credentials: get_block(node, "credentials"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
            server_root_ca_certificate: get_string(node, "server_root_ca_certificate"),
            servers: get_strings(node, "servers"),
            starting_position: get_string(node, "starting_position"),
            topic: get_string(node, "topic"),
            vpc: get_block(node, "vpc"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_string(&mut node, "consumer_group_id", &self.consumer_group_id);
        put_block(&mut node, "credentials", &self.credentials);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        put_string(
            &mut node,
            "server_root_ca_certificate",
            &self.server_root_ca_certificate,
        );
        put_strings(&mut node, "servers", &self.servers);
        put_string(&mut node, "starting_position", &self.starting_position);
        put_string(&mut node, "topic", &self.topic);
        put_block(&mut node, "vpc", &self.vpc);
        node
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqsQueueConfig {
    pub batch_size: Option<i64>,
    pub maximum_batching_window_in_seconds: Option<i64>,
}

impl ConfigBlock for SqsQueueConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            batch_size: get_int(node, "batch_size"),
            maximum_batching_window_in_seconds: get_int(node, "maximum_batching_window_in_seconds"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_int(&mut node, "batch_size", self.batch_size);
        put_int(
            &mut node,
            "maximum_batching_window_in_seconds",
            self.maximum_batching_window_in_seconds,
        );
        node
    }
}

// =============================================================================
// Root
// =============================================================================

/// The `source_parameters` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceParametersConfig {
    pub activemq_broker_parameters: Option<ActiveMqBrokerConfig>,
    pub dynamodb_stream_parameters: Option<DynamoDbStreamConfig>,
    pub filter_criteria: Option<FilterCriteriaConfig>,
    pub kinesis_stream_parameters: Option<KinesisStreamConfig>,
    pub managed_streaming_kafka_parameters: Option<ManagedStreamingKafkaConfig>,
    pub rabbit_mq_broker: Option<RabbitMqBrokerConfig>,
    pub self_managed_kafka: Option<SelfManagedKafkaConfig>,
    pub sqs_queue_parameters: Option<SqsQueueConfig>,
}

impl SourceParametersConfig {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl ConfigBlock for SourceParametersConfig {
    fn from_value(node: &HashMap<String, Value>) -> Self {
        Self {
            activemq_broker_parameters: get_block(node, "activemq_broker_parameters"),
            dynamodb_stream_parameters: get_block(node, "dynamodb_stream_parameters"),
            filter_criteria: get_block(node, "filter_criteria"),
            kinesis_stream_parameters: get_block(node, "kinesis_stream_parameters"),
            managed_streaming_kafka_parameters: get_block(
                node,
                "managed_streaming_kafka_parameters",
            ),
            rabbit_mq_broker: get_block(node, "rabbit_mq_broker"),
            self_managed_kafka: get_block(node, "self_managed_kafka"),
            sqs_queue_parameters: get_block(node, "sqs_queue_parameters"),
        }
    }

    fn to_value(&self) -> HashMap<String, Value> {
        let mut node = HashMap::new();
        put_block(
            &mut node,
            "activemq_broker_parameters",
            &self.activemq_broker_parameters,
        );
        put_block(
            &mut node,
            "dynamodb_stream_parameters",
            &self.dynamodb_stream_parameters,
        );
        put_block(&mut node, "filter_criteria", &self.filter_criteria);
        put_block(
            &mut node,
            "kinesis_stream_parameters",
            &self.kinesis_stream_parameters,
        );
        put_block(
            &mut node,
            "managed_streaming_kafka_parameters",
            &self.managed_streaming_kafka_parameters,
        );
        put_block(&mut node, "rabbit_mq_broker", &self.rabbit_mq_broker);
        put_block(&mut node, "self_managed_kafka", &self.self_managed_kafka);
        put_block(&mut node, "sqs_queue_parameters", &self.sqs_queue_parameters);
        node
    }
}
