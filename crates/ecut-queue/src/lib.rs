//! In-process job queue.
//!
//! This crate provides:
//! - The `ProcessVideoJob` message handed from the API to the worker
//! - A bounded queue with cloneable senders and a single consumer

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::ProcessVideoJob;
pub use queue::{JobQueue, JobSender, QueueConfig};
