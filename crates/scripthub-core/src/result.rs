//! Convenience result type alias for ScriptHub.

use crate::error::AppError;

/// A specialized `Result` type for ScriptHub operations.
pub type AppResult<T> = Result<T, AppError>;
