//! Row identity errors

use thiserror::Error;

/// Result type for row id operations
pub type RowIdResult<T> = Result<T, RowIdError>;

/// Row identity errors. Both variants are caller errors and leave the
/// manager unchanged.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RowIdError {
    #[error("Row ID {0} already present")]
    AlreadyPresent(i64),

    #[error("Row ID {0} not found")]
    NotFound(i64),
}
