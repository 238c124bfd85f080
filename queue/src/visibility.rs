//! The per-message visibility-timeout extender (spec §4.3): keeps a
//! received message invisible to other consumers for as long as its
//! handler is running, without holding it invisible indefinitely.

use std::sync::Arc;
use std::time::Duration;

use futures::future::FutureExt;
use tracing::error;

use crate::client::QueueClient;
use crate::message::MessageSignals;

/// Seconds before the current extension expires that the ticker fires, so
/// the next `ChangeMessageVisibility` call lands before the queue's own
/// timeout would re-deliver the message.
pub(crate) const VISIBILITY_TIMEOUT_CONTROL_SECONDS: i32 = 10;

/// The queue service's own cap on a single visibility timeout value.
const MAX_VISIBILITY_SECONDS: i32 = 12 * 3600;

/// Clamps a visibility value to the range the queue service accepts:
/// negative values become `0`, values above 12 hours are capped at 12
/// hours.
pub(crate) fn clamp_visibility_seconds(value: i64) -> i32 {
    if value < 0 {
        0
    } else if value > MAX_VISIBILITY_SECONDS as i64 {
        MAX_VISIBILITY_SECONDS
    } else {
        value as i32
    }
}

/// Route-derived visibility timeout, clamped so the extender always gets
/// at least one second of headroom before its first ticker fire (spec:
/// "clamped to >= defaultVisibilityTimeoutControl + 1").
pub(crate) fn clamp_route_visibility_timeout(configured: i32) -> i32 {
    if configured <= VISIBILITY_TIMEOUT_CONTROL_SECONDS {
        VISIBILITY_TIMEOUT_CONTROL_SECONDS + 1
    } else {
        configured
    }
}

pub(crate) struct VisibilityExtender {
    client: Arc<dyn QueueClient>,
    queue_url: String,
    receipt_handle: String,
    visibility_timeout: i32,
    extension_limit: usize,
}

impl VisibilityExtender {
    pub(crate) fn new(
        client: Arc<dyn QueueClient>,
        queue_url: String,
        receipt_handle: String,
        visibility_timeout: i32,
        extension_limit: usize,
    ) -> Self {
        Self {
            client,
            queue_url,
            receipt_handle,
            visibility_timeout: clamp_route_visibility_timeout(visibility_timeout),
            extension_limit,
        }
    }

    /// Runs the extender to completion: initial extension, then up to
    /// `extension_limit` ticker-driven extensions, racing the worker's
    /// dispatch/backoff signals at every step.
    pub(crate) async fn run(self, signals: MessageSignals) {
        let MessageSignals {
            dispatch_rx,
            backoff_rx,
        } = signals;
        // Fused so that a `Message` dropped without an explicit dispatch or
        // backoff call (the handler-error path, spec §4.5) closes these
        // channels harmlessly: the branch below simply stops firing instead
        // of being mistaken for a real dispatch/backoff signal.
        let mut dispatch_rx = dispatch_rx.fuse();
        let mut backoff_rx = backoff_rx.fuse();

        if let Err(err) = self
            .change_visibility(self.visibility_timeout as i64)
            .await
        {
            error!("failed to set initial visibility timeout: {err}");
        }

        let tick_period = Duration::from_secs(
            (self.visibility_timeout - VISIBILITY_TIMEOUT_CONTROL_SECONDS).max(1) as u64,
        );
        let mut ticker = tokio::time::interval(tick_period);
        // The first tick fires immediately; only the periodic ticks that
        // follow the initial extension should drive another extension.
        ticker.tick().await;

        let mut extension = self.visibility_timeout as i64;
        let mut count = 0usize;

        loop {
            if count >= self.extension_limit {
                return;
            }

            tokio::select! {
                res = &mut dispatch_rx => {
                    // Only a genuine `Message::dispatch()` call ends the
                    // extender here; a closed channel (`Err`) from an
                    // errored handler dropping the message is ignored so
                    // extension keeps going until the limit is reached.
                    if res.is_ok() {
                        return;
                    }
                }
                res = &mut backoff_rx => {
                    if let Ok(delay) = res {
                        if let Err(err) = self.change_visibility(delay.as_secs() as i64).await {
                            error!("failed to apply backoff visibility timeout: {err}");
                        }
                        return;
                    }
                }
                _ = ticker.tick() => {
                    count += 1;
                    extension += self.visibility_timeout as i64;
                    if let Err(err) = self.change_visibility(extension).await {
                        error!("failed to extend visibility timeout: {err}");
                        return;
                    }
                }
            }
        }
    }

    async fn change_visibility(&self, seconds: i64) -> Result<(), crate::errors::QueueError> {
        self.client
            .change_message_visibility(
                &self.queue_url,
                &self.receipt_handle,
                clamp_visibility_seconds(seconds),
            )
            .await
    }
}
