//! Custom Axum extractors.

pub mod reclaim_auth;

pub use reclaim_auth::ReclaimAuth;
