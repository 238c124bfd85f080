use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::oneshot;

use crate::client::WireMessage;

/// The standard notification envelope a message body may be wrapped in:
/// `{"Message": "...", "Timestamp": "...", "MessageAttributes": {...}}`.
/// When the raw body does not parse into this shape the envelope views
/// (`message()`, `timestamp()`) are empty and only `body()` is populated.
#[derive(Debug, Clone, Deserialize)]
struct NotificationEnvelope {
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "Timestamp", default)]
    timestamp: String,
    #[serde(rename = "MessageAttributes", default)]
    message_attributes: HashMap<String, EnvelopeAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
struct EnvelopeAttribute {
    #[serde(rename = "Value", default)]
    value: String,
}

#[derive(Debug, Clone, Default)]
struct Envelope {
    message: String,
    timestamp: String,
    user_attributes: HashMap<String, String>,
}

/// Consumed exactly once by the extender to learn that the worker has
/// finished handling the message, one way or another. Uses interior
/// mutability so a handler holding only `&Message` can still fire it
/// indirectly via [`Message::dispatch`].
pub(crate) struct DispatchSignal {
    tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl DispatchSignal {
    pub(crate) fn fire(&self) {
        if let Some(tx) = self.tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }
}

/// Consumed exactly once by the extender to learn the handler-requested
/// backoff delay; firing this also terminates the extension loop.
pub(crate) struct BackoffSignal {
    tx: Mutex<Option<oneshot::Sender<Duration>>>,
}

impl BackoffSignal {
    fn fire(&self, delay: Duration) {
        if let Some(tx) = self.tx.lock().unwrap().take() {
            let _ = tx.send(delay);
        }
    }
}

/// One wire message after decoding, as described by spec §3. Owned by
/// exactly one route at a time.
pub struct Message {
    raw_body: String,
    envelope: Envelope,
    system_attributes: HashMap<String, String>,
    user_attributes: HashMap<String, String>,
    receipt_handle: String,
    message_id: String,
    backed_off: Arc<AtomicBool>,
    dispatch: DispatchSignal,
    backoff: BackoffSignal,
}

/// The receiver-side halves of a message's two single-shot signals,
/// retained by the route so it can hand them to the visibility extender
/// without the `Message` itself needing a back-reference (spec §9).
pub(crate) struct MessageSignals {
    pub(crate) dispatch_rx: oneshot::Receiver<()>,
    pub(crate) backoff_rx: oneshot::Receiver<Duration>,
}

impl Message {
    pub(crate) fn from_wire(wire: WireMessage) -> (Self, MessageSignals) {
        let (dispatch_tx, dispatch_rx) = oneshot::channel();
        let (backoff_tx, backoff_rx) = oneshot::channel();

        let envelope = match serde_json::from_str::<NotificationEnvelope>(&wire.body) {
            Ok(parsed) if !parsed.message.is_empty() || !parsed.message_attributes.is_empty() => {
                Envelope {
                    message: parsed.message,
                    timestamp: parsed.timestamp,
                    user_attributes: parsed
                        .message_attributes
                        .into_iter()
                        .map(|(k, v)| (k, v.value))
                        .collect(),
                }
            }
            _ => Envelope::default(),
        };

        let message = Message {
            raw_body: wire.body,
            envelope,
            system_attributes: wire.system_attributes,
            user_attributes: wire.user_attributes,
            receipt_handle: wire.receipt_handle,
            message_id: wire.message_id,
            backed_off: Arc::new(AtomicBool::new(false)),
            dispatch: DispatchSignal {
                tx: Mutex::new(Some(dispatch_tx)),
            },
            backoff: BackoffSignal {
                tx: Mutex::new(Some(backoff_tx)),
            },
        };

        (
            message,
            MessageSignals {
                dispatch_rx,
                backoff_rx,
            },
        )
    }

    /// The raw, undecoded message body as received from the queue.
    pub fn body(&self) -> &str {
        &self.raw_body
    }

    /// The decoded `Message` field of the notification envelope, or an
    /// empty string if the body did not carry one.
    pub fn message(&self) -> &str {
        &self.envelope.message
    }

    /// The decoded `Timestamp` field of the notification envelope.
    pub fn timestamp(&self) -> &str {
        &self.envelope.timestamp
    }

    /// A producer-attached attribute promoted from the notification
    /// envelope's `MessageAttributes`, or queue-level user attributes when
    /// there was no envelope. Returns an empty string if unset.
    pub fn attribute(&self, key: &str) -> &str {
        self.envelope
            .user_attributes
            .get(key)
            .or_else(|| self.user_attributes.get(key))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn user_attributes(&self) -> &HashMap<String, String> {
        &self.user_attributes
    }

    /// A queue-provided system attribute (`MessageGroupId`,
    /// `ApproximateReceiveCount`, ...). Returns an empty string if unset.
    pub fn system_attribute(&self, key: &str) -> &str {
        self.system_attributes
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn system_attributes(&self) -> &HashMap<String, String> {
        &self.system_attributes
    }

    pub fn group_id(&self) -> &str {
        self.system_attribute("MessageGroupId")
    }

    /// The opaque receipt handle used to commit or extend this message.
    pub fn identifier(&self) -> &str {
        &self.receipt_handle
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Requests that the visibility timeout be set to `delay` and that the
    /// message not be deleted once the handler returns. May be called at
    /// most once; subsequent calls are no-ops.
    pub fn backoff(&self, delay: Duration) {
        self.backed_off.store(true, Ordering::SeqCst);
        self.backoff.fire(delay);
    }

    /// True once `backoff` has been called; instructs the worker to skip
    /// the delete step.
    pub fn backed_off(&self) -> bool {
        self.backed_off.load(Ordering::SeqCst)
    }

    pub(crate) fn dispatch(&self) {
        self.dispatch.fire();
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("message_id", &self.message_id)
            .field("group_id", &self.group_id())
            .field("backed_off", &self.backed_off())
            .finish()
    }
}
