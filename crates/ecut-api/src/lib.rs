//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload and job status endpoints
//! - Static delivery of uploaded videos and finished clips
//! - Request IDs, request logging and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, JobStoreKind};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{build_store, AppState};
