//! Convenience result type alias for Dropcode.

use crate::error::AppError;

/// A specialized `Result` type for Dropcode operations.
pub type AppResult<T> = Result<T, AppError>;
