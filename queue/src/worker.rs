//! A worker reads messages from its channel and runs them through the
//! handler and commit step (spec §4.5).

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;
use wharf_helpers::telemetry::{MESSAGE_GROUP_ID_KEY, MESSAGE_IDENTIFIER_KEY};

use crate::errors::QueueError;
use crate::message::Message;
use crate::route::Route;

/// Drains `rx` until the channel closes (the route's poll loop stopped and
/// dropped its senders). For each message: invoke the handler, then commit.
pub(crate) async fn run(route: Arc<Route>, mut rx: mpsc::Receiver<Message>) {
    while let Some(msg) = rx.recv().await {
        match route.handler().handle(&msg).await {
            Ok(()) => {
                if let Err(err) = commit(&route, &msg).await {
                    error!(
                        { MESSAGE_IDENTIFIER_KEY } = msg.identifier(),
                        { MESSAGE_GROUP_ID_KEY } = msg.group_id(),
                        "commit failed: {err}"
                    );
                }
            }
            Err(err) => {
                error!(
                    { MESSAGE_IDENTIFIER_KEY } = msg.identifier(),
                    { MESSAGE_GROUP_ID_KEY } = msg.group_id(),
                    body = msg.body(),
                    "message handler failed: {err}"
                );
                // No dispatch/commit: the extender keeps running and the
                // message redelivers once its extensions exhaust.
            }
        }
    }
}

/// If the handler requested backoff, do nothing (the extender already
/// re-armed visibility and will exit on its own). Otherwise stop the
/// extender and delete the message.
async fn commit(route: &Route, msg: &Message) -> Result<(), QueueError> {
    if msg.backed_off() {
        return Ok(());
    }

    msg.dispatch();
    route
        .queue_client()
        .delete_message(route.queue_url(), msg.identifier())
        .await
}
