//! Publishes notifications to a topic (spec §4.6). Holds a topic client
//! handle only.

use crate::client::{PublishBatchEntry, PublishBatchOutcome, PublishInput, TopicClient};
use crate::errors::{QueueError, QueueErrorKind};

/// Single-call cap; batch publish above this is rejected.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

pub struct Publisher<C: TopicClient> {
    client: C,
}

impl<C: TopicClient> Publisher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Rejects empty input with `ErrEmptyInput`. Returns the server-assigned
    /// message id, or wraps the underlying error per spec.
    pub async fn publish(&self, input: PublishInput) -> Result<String, QueueError> {
        if input.message.is_empty() || input.topic_arn.is_empty() {
            return Err(QueueError::new(QueueErrorKind::EmptyInput));
        }

        let topic_arn = input.topic_arn.clone();
        self.client.publish(input).await.map_err(|err| {
            QueueError::literal(
                QueueErrorKind::EmptyInput,
                format!("failed to publish message; topic: {topic_arn}  error: {err}"),
            )
        })
    }

    /// Rejects empty or oversized (`> DEFAULT_MAX_BATCH_SIZE`) batches.
    pub async fn publish_batch(
        &self,
        topic_arn: &str,
        entries: Vec<PublishBatchEntry>,
    ) -> Result<PublishBatchOutcome, QueueError> {
        if entries.is_empty() {
            return Err(QueueError::new(QueueErrorKind::EmptyInput));
        }

        if entries.len() > DEFAULT_MAX_BATCH_SIZE {
            return Err(QueueError::literal(
                QueueErrorKind::EmptyInput,
                format!("maximum batch size is {DEFAULT_MAX_BATCH_SIZE}"),
            ));
        }

        self.client.publish_batch(topic_arn, entries).await
    }
}

/// `arn:aws:sns:<region>:<account_id>:<topic_name>`; fails if any part is
/// empty.
pub fn build_topic_arn(region: &str, account_id: &str, topic_name: &str) -> Result<String, QueueError> {
    if region.is_empty() || account_id.is_empty() || topic_name.is_empty() {
        return Err(QueueError::new(QueueErrorKind::EmptyParam));
    }
    Ok(format!("arn:aws:sns:{region}:{account_id}:{topic_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeTopicClient {
        publish_result: Result<String, ()>,
        batch_result: PublishBatchOutcome,
        published: Mutex<Vec<PublishInput>>,
    }

    #[async_trait]
    impl TopicClient for FakeTopicClient {
        async fn publish(&self, input: PublishInput) -> Result<String, QueueError> {
            self.published.lock().unwrap().push(input);
            self.publish_result
                .clone()
                .map_err(|_| QueueError::new(QueueErrorKind::EmptyInput))
        }

        async fn publish_batch(
            &self,
            _topic_arn: &str,
            _entries: Vec<PublishBatchEntry>,
        ) -> Result<PublishBatchOutcome, QueueError> {
            Ok(self.batch_result.clone())
        }
    }

    #[tokio::test]
    async fn rejects_empty_input() {
        let publisher = Publisher::new(FakeTopicClient {
            publish_result: Ok("id".to_string()),
            batch_result: PublishBatchOutcome::default(),
            published: Mutex::new(Vec::new()),
        });

        let err = publisher
            .publish(PublishInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), QueueErrorKind::EmptyInput);
    }

    #[tokio::test]
    async fn wraps_underlying_publish_failure_without_kind_prefix() {
        let publisher = Publisher::new(FakeTopicClient {
            publish_result: Err(()),
            batch_result: PublishBatchOutcome::default(),
            published: Mutex::new(Vec::new()),
        });

        let err = publisher
            .publish(PublishInput {
                message: "hi".to_string(),
                topic_arn: "arn:aws:sns:us-east-1:123:topic".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to publish message; topic: arn:aws:sns:us-east-1:123:topic  error: empty input"
        );
    }

    #[tokio::test]
    async fn publishes_and_returns_message_id() {
        let publisher = Publisher::new(FakeTopicClient {
            publish_result: Ok("msg-1".to_string()),
            batch_result: PublishBatchOutcome::default(),
            published: Mutex::new(Vec::new()),
        });

        let id = publisher
            .publish(PublishInput {
                message: "hi".to_string(),
                topic_arn: "arn:aws:sns:us-east-1:123:topic".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(id, "msg-1");
    }

    #[tokio::test]
    async fn rejects_oversized_batch() {
        let publisher = Publisher::new(FakeTopicClient {
            publish_result: Ok("id".to_string()),
            batch_result: PublishBatchOutcome::default(),
            published: Mutex::new(Vec::new()),
        });

        let entries = (0..11)
            .map(|i| PublishBatchEntry {
                id: i.to_string(),
                message: "m".to_string(),
                ..Default::default()
            })
            .collect();

        let err = publisher
            .publish_batch("arn:aws:sns:us-east-1:123:topic", entries)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), QueueErrorKind::EmptyInput);
        assert_eq!(err.to_string(), "maximum batch size is 10");
    }

    #[test]
    fn builds_topic_arn() {
        assert_eq!(
            build_topic_arn("us-east-1", "123456789012", "orders").unwrap(),
            "arn:aws:sns:us-east-1:123456789012:orders"
        );
    }

    #[test]
    fn rejects_empty_arn_parts() {
        assert!(build_topic_arn("", "123", "orders").is_err());
    }
}
