//! Worker selection (spec §4.4): assigns each received message to one of a
//! route's worker channels, either by random spray (`Parallel`) or by a
//! deterministic group-key hash (`PerGroupID`) so that messages sharing a
//! group key always land on the same worker and are handled in order.

use rand::Rng;

use crate::message::Message;
use crate::route::RunMode;

/// Builds the group key for a message in `PerGroupID` mode: the queue's
/// `MessageGroupId` system attribute, followed by `":" + value` for each
/// of the route's custom group fields (in order) that the message carries
/// a non-empty user attribute for.
pub(crate) fn group_key(msg: &Message, custom_group_fields: &[String]) -> String {
    let mut key = msg.group_id().to_string();
    for field in custom_group_fields {
        let value = msg.attribute(field);
        if !value.is_empty() {
            key.push(':');
            key.push_str(value);
        }
    }
    key
}

/// The djb-like accumulator spec §4.4 specifies: `h = (h << 5) - h + c`
/// over each Unicode scalar value of `key`, forced non-negative. Uses
/// wrapping arithmetic so the function never panics regardless of key
/// length, and is deterministic across processes as required by spec
/// invariant 5.
pub(crate) fn hash_key(key: &str) -> u64 {
    let mut h: i64 = 0;
    for c in key.chars() {
        h = (h.wrapping_shl(5))
            .wrapping_sub(h)
            .wrapping_add(c as i64);
    }
    h.unsigned_abs()
}

/// Picks the worker channel index for `msg` given a worker pool of size
/// `worker_count`, `worker_count` must be non-zero.
pub(crate) fn worker_index(
    msg: &Message,
    run_mode: RunMode,
    custom_group_fields: &[String],
    worker_count: usize,
) -> usize {
    match run_mode {
        RunMode::Parallel => rand::thread_rng().gen_range(0..worker_count),
        RunMode::PerGroupID => {
            let key = group_key(msg, custom_group_fields);
            (hash_key(&key) as usize) % worker_count
        }
    }
}
