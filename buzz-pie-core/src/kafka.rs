use crate::payload::{Payload, Record};
use crate::source::RecordSource;
use buzz_pie_common::{BuzzPieError, KafkaConfig, Result};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::Message;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

/// Kafka topic subscription polled synchronously from the consumer thread.
pub struct KafkaSource {
    consumer: Option<BaseConsumer>,
    topic: String,
    group_id: String,
    poll_interval: Duration,
}

impl KafkaSource {
    pub fn connect(cfg: &KafkaConfig) -> Result<Self> {
        info!("Kafka topic: {}", cfg.topic);
        info!("Kafka consumer group id: {}", cfg.group_id);
        info!(
            "Consumer connecting to topic '{}' in group '{}' via {}...",
            cfg.topic, cfg.group_id, cfg.brokers
        );
        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", &cfg.brokers)
            .set("group.id", &cfg.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", &cfg.auto_offset_reset)
            .set("enable.partition.eof", "false")
            .create()
            .map_err(|e| BuzzPieError::Queue(format!("failed to create Kafka consumer: {e}")))?;
        consumer
            .subscribe(&[cfg.topic.as_str()])
            .map_err(|e| BuzzPieError::Queue(format!("failed to subscribe to '{}': {e}", cfg.topic)))?;
        Ok(Self {
            consumer: Some(consumer),
            topic: cfg.topic.clone(),
            group_id: cfg.group_id.clone(),
            poll_interval: Duration::from_millis(cfg.poll_interval_ms.max(1)),
        })
    }
}

impl RecordSource for KafkaSource {
    fn describe(&self) -> String {
        format!("topic '{}' (group '{}')", self.topic, self.group_id)
    }

    fn next_record(&mut self, stop: &AtomicBool) -> Result<Option<Record>> {
        let Some(consumer) = self.consumer.as_ref() else {
            return Ok(None);
        };
        // short polls so a stop request is noticed between them
        while !stop.load(Ordering::Relaxed) {
            match consumer.poll(self.poll_interval) {
                None => continue,
                Some(Ok(msg)) => {
                    let payload = match msg.payload() {
                        Some(bytes) => Payload::Binary(bytes.to_vec()),
                        None => Payload::Empty,
                    };
                    return Ok(Some(Record::new(msg.offset(), payload)));
                }
                Some(Err(e)) => return Err(BuzzPieError::Queue(e.to_string())),
            }
        }
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(consumer) = self.consumer.take() {
            consumer.unsubscribe();
            info!("Kafka consumer for topic '{}' closed.", self.topic);
        }
        Ok(())
    }
}
