//! Credential loading, region resolution and SDK client construction for
//! the AWS SQS and SNS services. Kept deliberately thin: the dispatch core
//! in the `queue` crate never depends on this crate directly, it only
//! depends on the `QueueClient` / `TopicClient` traits it defines. Binding
//! an application to real AWS is a matter of constructing a client here
//! and handing it to one of the adapters in `queue::adapters`.

pub mod aws_regions;
pub mod clients;
pub mod credentials;
