//! Thin translation shims binding the real AWS SDK clients to the
//! `QueueClient` / `TopicClient` traits (spec §4.8). No retry policy, no
//! credential handling — that is `wharf_aws`'s concern, not the core's.

pub mod sns;
pub mod sqs;
