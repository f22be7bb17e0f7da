//! # dropcode-entity
//!
//! Domain entity models for Dropcode. [`share::Share`] mirrors a row of
//! the `shares` table and derives `sqlx::FromRow`; the remaining types are
//! value objects that enforce the share lifecycle's bounds.

pub mod share;
