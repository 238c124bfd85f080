//! Ambient, domain-agnostic helpers shared across the workspace: environment
//! variable access, clock abstractions, retry backoff math and the logging
//! field keys used to correlate structured log lines.

pub mod env;
pub mod retries;
pub mod telemetry;
pub mod time;
