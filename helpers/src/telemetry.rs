/// The key used to correlate a handler failure or commit failure log line
/// back to the message that produced it, across the worker/extender task
/// boundary where a shared span is not available.
pub const MESSAGE_IDENTIFIER_KEY: &str = "identifier";

/// The key used to tag a log line with the FIFO group a message belongs to,
/// empty when the message does not carry a `MessageGroupId`.
pub const MESSAGE_GROUP_ID_KEY: &str = "group_id";
