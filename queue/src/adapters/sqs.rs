use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sqs::types::MessageSystemAttributeName;
use aws_sdk_sqs::Client;

use crate::client::{QueueClient, ReceiveRequest, WireMessage};
use crate::errors::{QueueError, QueueErrorKind};

/// Wraps `aws_sdk_sqs::Client`, translating its wire types into the core's
/// `WireMessage` shape. No retry policy, no credential handling.
pub struct SqsQueueClient {
    client: Client,
}

impl SqsQueueClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn get_queue_url(&self, queue_name: &str) -> Result<String, QueueError> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::NoQueueClient, err))?;

        output
            .queue_url
            .ok_or_else(|| QueueError::new(QueueErrorKind::NoQueueClient))
    }

    async fn receive_messages(
        &self,
        req: ReceiveRequest<'_>,
    ) -> Result<Vec<WireMessage>, QueueError> {
        let output = self
            .client
            .receive_message()
            .queue_url(req.queue_url)
            .max_number_of_messages(req.max_messages)
            .wait_time_seconds(req.wait_time_seconds)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .message_attribute_names("All")
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::GetMessage, err))?;

        let messages = output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|msg| WireMessage {
                message_id: msg.message_id.unwrap_or_default(),
                receipt_handle: msg.receipt_handle.unwrap_or_default(),
                body: msg.body.unwrap_or_default(),
                system_attributes: msg
                    .attributes
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(k, v)| (k.as_str().to_string(), v))
                    .collect(),
                user_attributes: msg
                    .message_attributes
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(k, v)| v.string_value.map(|value| (k, value)))
                    .collect::<HashMap<String, String>>(),
            })
            .collect();

        Ok(messages)
    }

    async fn change_message_visibility(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        timeout_secs: i32,
    ) -> Result<(), QueueError> {
        self.client
            .change_message_visibility()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .visibility_timeout(timeout_secs)
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::GetMessage, err))?;
        Ok(())
    }

    async fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::GetMessage, err))?;
        Ok(())
    }
}
