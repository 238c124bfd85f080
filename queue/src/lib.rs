//! A multi-route, queue-backed message dispatch engine: a Manager
//! supervises N Routes, each long-polling its own queue and fanning
//! received messages out to a worker pool, with per-message visibility
//! extension and optional FIFO group affinity.
//!
//! The core never constructs a real AWS client; `adapters::sqs` and
//! `adapters::sns` are thin shims binding `aws_sdk_sqs`/`aws_sdk_sns` to
//! the [`client::QueueClient`] / [`client::TopicClient`] traits this crate
//! actually depends on, so the dispatch logic is testable against
//! in-memory fakes.

pub mod adapters;
pub mod client;
pub mod errors;
pub mod handler;
pub mod manager;
pub mod message;
pub mod publisher;
pub mod route;

mod dispatcher;
mod visibility;
mod worker;

pub use client::{QueueClient, TopicClient};
pub use errors::{HandlerError, QueueError, QueueErrorKind};
pub use handler::MessageHandler;
pub use manager::Manager;
pub use message::Message;
pub use publisher::Publisher;
pub use route::{Route, RouteConfig, RunMode};
