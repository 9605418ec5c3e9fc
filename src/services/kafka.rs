use crate::services::Publisher;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when publishing to the broker
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Message for topic {topic} was not delivered: {reason}")]
    NotDelivered { topic: String, reason: String },
}

/// Kafka publisher for the ingestion relay
///
/// Owns a single producer bound to one topic; each relay task gets its own
/// instance, no handle is shared.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Create a producer against the given bootstrap servers
    pub fn new(brokers: &str, topic: String) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer, topic })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl Publisher for KafkaPublisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), PublishError> {
        let record = FutureRecord::<(), _>::to(&self.topic).payload(payload);

        self.producer
            .send(record, Timeout::After(Duration::from_secs(5)))
            .await
            .map_err(|(e, _message)| PublishError::NotDelivered {
                topic: self.topic.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}
