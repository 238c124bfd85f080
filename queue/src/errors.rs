use std::error::Error as StdError;
use std::fmt;

/// Stable identity of a `QueueError`. Two errors with the same kind are
/// considered the same error for comparison purposes regardless of any
/// wrapped cause, mirroring the original `SQSError` equality contract
/// (`loafergo.ErrNoRoute == someErr` must still hold after `.Context(cause)`
/// wraps it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueErrorKind {
    /// `Manager::run` was called with no routes registered.
    NoRoute,
    /// The poll loop failed to receive messages from the queue.
    GetMessage,
    /// Client construction failed due to invalid credentials.
    InvalidCreds,
    /// A configuration attribute could not be marshalled.
    Marshal,
    /// `Route::configure` was called with no queue client set.
    NoQueueClient,
    /// `Route::configure` was called with no handler registered.
    NoHandler,
    /// A required constructor parameter was missing.
    EmptyParam,
    /// A required configuration field was missing.
    EmptyRequiredField,
    /// `Publisher::publish`/`publish_batch` was called with empty input.
    EmptyInput,
}

impl QueueErrorKind {
    fn message(self) -> &'static str {
        match self {
            QueueErrorKind::NoRoute => "message received without a route",
            QueueErrorKind::GetMessage => "unable to retrieve message",
            QueueErrorKind::InvalidCreds => "invalid aws credentials",
            QueueErrorKind::Marshal => "unable to marshal request",
            QueueErrorKind::NoQueueClient => "queue client is nil",
            QueueErrorKind::NoHandler => "handler is nil",
            QueueErrorKind::EmptyParam => "required parameter is missing",
            QueueErrorKind::EmptyRequiredField => "required field is missing",
            QueueErrorKind::EmptyInput => "empty input",
        }
    }
}

/// The error type shared across the dispatch core. Carries a stable
/// [`QueueErrorKind`] plus an optional wrapped cause, following the
/// `SQSError`/`SQSError.Context` convention from the original
/// implementation: `kind.context(cause)` produces
/// `"<kind message>: <cause>"` while still comparing equal (by kind) to
/// the un-wrapped sentinel.
#[derive(Debug)]
enum QueueErrorDetail {
    Cause(Box<dyn StdError + Send + Sync + 'static>),
    Literal(String),
}

#[derive(Debug)]
pub struct QueueError {
    kind: QueueErrorKind,
    detail: Option<QueueErrorDetail>,
}

impl QueueError {
    pub fn new(kind: QueueErrorKind) -> Self {
        Self { kind, detail: None }
    }

    /// Wraps `self` with a contextual cause, preserving the original kind
    /// for equality/`kind()` purposes. `Display` renders as `"<kind
    /// message>: <cause>"`.
    pub fn context(kind: QueueErrorKind, cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            kind,
            detail: Some(QueueErrorDetail::Cause(cause.into())),
        }
    }

    /// Like `context`, but `message` is the complete `Display` output
    /// verbatim — `kind`'s own message is not prefixed. Use this when the
    /// caller has already composed the full user-facing string.
    pub fn literal(kind: QueueErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            detail: Some(QueueErrorDetail::Literal(message.into())),
        }
    }

    pub fn kind(&self) -> QueueErrorKind {
        self.kind
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(QueueErrorDetail::Cause(cause)) => write!(f, "{}: {}", self.kind.message(), cause),
            Some(QueueErrorDetail::Literal(message)) => write!(f, "{message}"),
            None => write!(f, "{}", self.kind.message()),
        }
    }
}

impl StdError for QueueError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.detail {
            Some(QueueErrorDetail::Cause(cause)) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for QueueError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Error raised from a message handler.
#[derive(Debug)]
pub enum HandlerError {
    /// No handler was registered on the route that received the message.
    MissingHandler,
    /// The handler returned an application-level failure.
    Failure(Box<dyn StdError + Send + Sync + 'static>),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::MissingHandler => {
                write!(f, "message handler failed: a handler must be registered")
            }
            HandlerError::Failure(err) => write!(f, "message handler failed: {err}"),
        }
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            HandlerError::MissingHandler => None,
            HandlerError::Failure(err) => Some(err.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_preserves_kind_identity() {
        let bare = QueueError::new(QueueErrorKind::GetMessage);
        let wrapped = QueueError::context(
            QueueErrorKind::GetMessage,
            std::io::Error::other("connection reset"),
        );

        assert_eq!(bare, wrapped);
        assert_eq!(
            wrapped.to_string(),
            "unable to retrieve message: connection reset"
        );
    }

    #[test]
    fn literal_renders_verbatim_without_kind_prefix() {
        let err = QueueError::literal(QueueErrorKind::EmptyInput, "maximum batch size is 10");
        assert_eq!(err.to_string(), "maximum batch size is 10");
        assert_eq!(err.kind(), QueueErrorKind::EmptyInput);
    }

    #[test]
    fn different_kinds_are_not_equal() {
        let a = QueueError::new(QueueErrorKind::NoRoute);
        let b = QueueError::new(QueueErrorKind::NoHandler);
        assert_ne!(a, b);
    }
}
