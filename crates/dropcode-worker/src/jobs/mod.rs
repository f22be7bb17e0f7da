//! Built-in job handler implementations.

pub mod reclaim;

pub use reclaim::{RECLAIM_JOB, ReclaimJobHandler};
