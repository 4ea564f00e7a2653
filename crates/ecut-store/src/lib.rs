//! Job record storage.
//!
//! This crate provides:
//! - The `JobStore` key-value interface the pipeline and API depend on
//! - An in-memory backend for tests
//! - A JSON-file backend and a Redis backend for production
//! - A memory cache layered over a persistent backend

pub mod error;
pub mod file;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileJobStore;
pub use memory::MemoryJobStore;
pub use redis_store::RedisJobStore;
pub use store::{CachedJobStore, JobStore};
