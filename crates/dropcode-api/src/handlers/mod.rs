//! HTTP request handlers organized by domain.

pub mod blob;
pub mod health;
pub mod reclaim;
pub mod share;
