//! # dropcode-api
//!
//! HTTP API layer for Dropcode built on Axum.
//!
//! Provides the share, blob, reclaim and health endpoints, the bearer-secret
//! extractor guarding reclamation, CORS and logging middleware, DTOs, and the
//! mapping from `AppError` to HTTP responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
