//! A Route binds one queue to one handler and runs its own poll loop and
//! worker pool (spec §4.2). Immutable once `configure` has resolved the
//! queue URL.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

use crate::client::{QueueClient, ReceiveRequest};
use crate::dispatcher::worker_index;
use crate::errors::{QueueError, QueueErrorKind};
use crate::handler::MessageHandler;
use crate::message::Message;
use crate::visibility::VisibilityExtender;
use crate::worker;

/// `Parallel = 0`, `PerGroupID = 1` (spec §6 run-mode tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Parallel = 0,
    PerGroupID = 1,
}

/// Everything needed to build a [`Route`] before it resolves a queue URL.
pub struct RouteConfig {
    pub queue_client: Arc<dyn QueueClient>,
    pub handler: Option<Arc<dyn MessageHandler>>,
    pub queue_name: String,
    pub visibility_timeout: i32,
    pub max_messages: i32,
    pub wait_time_seconds: i32,
    pub worker_pool_size: usize,
    pub extension_limit: usize,
    pub run_mode: RunMode,
    pub custom_group_fields: Vec<String>,
    pub retry_timeout: Duration,
}

impl RouteConfig {
    /// Defaults per spec §6: visibility 30s, max messages 10, wait-time
    /// 10s, worker-pool size 5, extension limit 2, retry timeout 5s.
    pub fn new(queue_client: Arc<dyn QueueClient>, queue_name: impl Into<String>) -> Self {
        Self {
            queue_client,
            handler: None,
            queue_name: queue_name.into(),
            visibility_timeout: 30,
            max_messages: 10,
            wait_time_seconds: 10,
            worker_pool_size: 5,
            extension_limit: 2,
            run_mode: RunMode::Parallel,
            custom_group_fields: Vec::new(),
            retry_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn MessageHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    pub fn with_custom_group_fields(mut self, fields: Vec<String>) -> Self {
        self.custom_group_fields = fields;
        self
    }

    pub fn with_worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = size;
        self
    }

    pub fn with_extension_limit(mut self, limit: usize) -> Self {
        self.extension_limit = limit;
        self
    }

    pub fn with_visibility_timeout(mut self, seconds: i32) -> Self {
        self.visibility_timeout = seconds;
        self
    }
}

/// A queue, its handler and its running machinery. Immutable once
/// `configure` has resolved `queue_url`.
pub struct Route {
    queue_client: Arc<dyn QueueClient>,
    handler: Arc<dyn MessageHandler>,
    queue_name: String,
    queue_url: String,
    visibility_timeout: i32,
    max_messages: i32,
    wait_time_seconds: i32,
    worker_pool_size: usize,
    extension_limit: usize,
    run_mode: RunMode,
    custom_group_fields: Vec<String>,
    retry_timeout: Duration,
}

impl Route {
    /// Resolves the queue URL and validates required fields. Must be
    /// called once, before `run`.
    pub async fn configure(config: RouteConfig) -> Result<Self, QueueError> {
        let handler = config
            .handler
            .ok_or_else(|| QueueError::new(QueueErrorKind::NoHandler))?;

        let queue_url = config
            .queue_client
            .get_queue_url(&config.queue_name)
            .await
            .map_err(|err| QueueError::context(QueueErrorKind::GetMessage, err))?;

        Ok(Route {
            queue_client: config.queue_client,
            handler,
            queue_name: config.queue_name,
            queue_url,
            visibility_timeout: config.visibility_timeout,
            max_messages: config.max_messages,
            wait_time_seconds: config.wait_time_seconds,
            worker_pool_size: config.worker_pool_size.max(1),
            extension_limit: config.extension_limit,
            run_mode: config.run_mode,
            custom_group_fields: config.custom_group_fields,
            retry_timeout: config.retry_timeout,
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Runs the poll loop until `cancellation` fires: allocates `W` worker
    /// channels and tasks, then long-polls for messages, dispatching each
    /// to a worker channel per §4.4.
    #[instrument(skip(self, cancellation), fields(queue = %self.queue_name))]
    pub async fn run(self: Arc<Self>, cancellation: CancellationToken) {
        let mut senders = Vec::with_capacity(self.worker_pool_size);
        let mut worker_tasks = Vec::with_capacity(self.worker_pool_size);

        for _ in 0..self.worker_pool_size {
            let (tx, rx) = mpsc::channel(self.max_messages.max(1) as usize);
            senders.push(tx);
            let route = self.clone();
            worker_tasks.push(tokio::spawn(worker::run(route, rx)));
        }

        loop {
            if cancellation.is_cancelled() {
                break;
            }

            let received = tokio::select! {
                _ = cancellation.cancelled() => break,
                result = self.queue_client.receive_messages(ReceiveRequest {
                    queue_url: &self.queue_url,
                    max_messages: self.max_messages,
                    wait_time_seconds: self.wait_time_seconds,
                }) => result,
            };

            let wire_messages = match received {
                Ok(messages) => messages,
                Err(err) => {
                    error!(
                        "unable to retrieve message: {}, retrying in {:?}",
                        err, self.retry_timeout
                    );
                    tokio::select! {
                        _ = cancellation.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_timeout) => {}
                    }
                    continue;
                }
            };

            for wire in wire_messages {
                let (msg, signals) = Message::from_wire(wire);

                let extender = VisibilityExtender::new(
                    self.queue_client.clone(),
                    self.queue_url.clone(),
                    msg.identifier().to_string(),
                    self.visibility_timeout,
                    self.extension_limit,
                );
                tokio::spawn(extender.run(signals));

                let index = worker_index(
                    &msg,
                    self.run_mode,
                    &self.custom_group_fields,
                    self.worker_pool_size,
                );

                tokio::select! {
                    _ = cancellation.cancelled() => break,
                    result = senders[index].send(msg) => {
                        if result.is_err() {
                            debug!("worker channel closed while dispatching, dropping message");
                        }
                    }
                }
            }
        }

        drop(senders);
        for task in worker_tasks {
            if let Err(err) = task.await {
                error!("worker task panicked: {err}");
            }
        }
    }

    pub(crate) fn handler(&self) -> &Arc<dyn MessageHandler> {
        &self.handler
    }

    pub(crate) fn queue_client(&self) -> &Arc<dyn QueueClient> {
        &self.queue_client
    }

    pub(crate) fn queue_url(&self) -> &str {
        &self.queue_url
    }
}
