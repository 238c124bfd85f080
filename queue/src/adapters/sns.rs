use async_trait::async_trait;
use aws_sdk_sns::types::{MessageAttributeValue, PublishBatchRequestEntry};
use aws_sdk_sns::Client;

use crate::client::{
    PublishBatchEntry, PublishBatchFailure, PublishBatchOutcome, PublishBatchSuccess,
    PublishInput, TopicClient,
};
use crate::errors::{QueueError, QueueErrorKind};

/// Wraps `aws_sdk_sns::Client`, translating the core's `PublishInput` /
/// `PublishBatchEntry` into SNS API requests (spec §4.6).
pub struct SnsTopicClient {
    client: Client,
}

impl SnsTopicClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn string_attribute(value: &str) -> MessageAttributeValue {
    MessageAttributeValue::builder()
        .data_type("String")
        .string_value(value)
        .build()
        .expect("data_type and string_value are always set")
}

#[async_trait]
impl TopicClient for SnsTopicClient {
    async fn publish(&self, input: PublishInput) -> Result<String, QueueError> {
        let mut request = self
            .client
            .publish()
            .message(&input.message)
            .target_arn(&input.topic_arn);

        if let Some(group_id) = &input.group_id {
            request = request.message_group_id(group_id);
        }
        if let Some(dedup_id) = &input.deduplication_id {
            request = request.message_deduplication_id(dedup_id);
        }
        for (key, value) in &input.attributes {
            request = request.message_attributes(key, string_attribute(value));
        }

        let output = request
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::EmptyInput, err))?;

        output
            .message_id
            .ok_or_else(|| QueueError::new(QueueErrorKind::EmptyInput))
    }

    async fn publish_batch(
        &self,
        topic_arn: &str,
        entries: Vec<PublishBatchEntry>,
    ) -> Result<PublishBatchOutcome, QueueError> {
        let batch_entries = entries
            .into_iter()
            .map(|entry| {
                let mut builder = PublishBatchRequestEntry::builder()
                    .id(entry.id)
                    .message(entry.message);
                if let Some(group_id) = entry.group_id {
                    builder = builder.message_group_id(group_id);
                }
                if let Some(dedup_id) = entry.deduplication_id {
                    builder = builder.message_deduplication_id(dedup_id);
                }
                for (key, value) in &entry.attributes {
                    builder = builder.message_attributes(key, string_attribute(value));
                }
                builder.build().map_err(|err| {
                    QueueError::context(QueueErrorKind::Marshal, err)
                })
            })
            .collect::<Result<Vec<_>, QueueError>>()?;

        let output = self
            .client
            .publish_batch()
            .topic_arn(topic_arn)
            .set_publish_batch_request_entries(Some(batch_entries))
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::EmptyInput, err))?;

        let successful = output
            .successful
            .unwrap_or_default()
            .into_iter()
            .map(|entry| PublishBatchSuccess {
                entry_id: entry.id.unwrap_or_default(),
                message_id: entry.message_id.unwrap_or_default(),
            })
            .collect();

        let failed = output
            .failed
            .unwrap_or_default()
            .into_iter()
            .map(|entry| PublishBatchFailure {
                entry_id: entry.id.unwrap_or_default(),
                error: format!(
                    "failed to publish message; error: {}",
                    entry.message.unwrap_or_default()
                ),
            })
            .collect();

        Ok(PublishBatchOutcome { successful, failed })
    }
}
