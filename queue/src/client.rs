//! The opaque client capabilities the dispatch core consumes (spec §6).
//! Nothing in this module knows how to build a real AWS client —
//! see `adapters` for the SDK-backed implementations — so the core can be
//! exercised against an in-memory fake in tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::QueueError;

/// One message as handed back by `QueueClient::receive_messages`, before
/// any envelope decoding. Shaped independently of `aws_sdk_sqs::types::Message`
/// so the core never needs the AWS SDK to run its tests.
#[derive(Debug, Clone)]
pub struct WireMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    /// Queue-provided system attributes (`MessageGroupId`,
    /// `ApproximateReceiveCount`, ...).
    pub system_attributes: HashMap<String, String>,
    /// Producer-attached message attributes (`StringValue` only).
    pub user_attributes: HashMap<String, String>,
}

/// Parameters for a single long-poll receive call.
#[derive(Debug, Clone)]
pub struct ReceiveRequest<'a> {
    pub queue_url: &'a str,
    pub max_messages: i32,
    pub wait_time_seconds: i32,
}

#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn get_queue_url(&self, queue_name: &str) -> Result<String, QueueError>;

    async fn receive_messages(
        &self,
        req: ReceiveRequest<'_>,
    ) -> Result<Vec<WireMessage>, QueueError>;

    async fn change_message_visibility(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        timeout_secs: i32,
    ) -> Result<(), QueueError>;

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str)
        -> Result<(), QueueError>;
}

/// Input to a single publish call.
#[derive(Debug, Clone, Default)]
pub struct PublishInput {
    pub message: String,
    pub topic_arn: String,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
    pub attributes: HashMap<String, String>,
}

/// One entry of a batch publish request.
#[derive(Debug, Clone, Default)]
pub struct PublishBatchEntry {
    pub id: String,
    pub message: String,
    pub group_id: Option<String>,
    pub deduplication_id: Option<String>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct PublishBatchSuccess {
    pub entry_id: String,
    pub message_id: String,
}

#[derive(Debug, Clone)]
pub struct PublishBatchFailure {
    pub entry_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct PublishBatchOutcome {
    pub successful: Vec<PublishBatchSuccess>,
    pub failed: Vec<PublishBatchFailure>,
}

#[async_trait]
pub trait TopicClient: Send + Sync {
    async fn publish(&self, input: PublishInput) -> Result<String, QueueError>;

    async fn publish_batch(
        &self,
        topic_arn: &str,
        entries: Vec<PublishBatchEntry>,
    ) -> Result<PublishBatchOutcome, QueueError>;
}
