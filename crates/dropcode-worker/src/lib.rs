//! Scheduled background tasks for Dropcode.
//!
//! This crate provides:
//! - A cron scheduler that fires registered tasks on their schedules
//! - A job executor that dispatches a fired task to its handler
//! - The reclamation job handler

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use scheduler::CronScheduler;
