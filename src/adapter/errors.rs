//! Adapter errors

use thiserror::Error;

use crate::rowid::RowIdError;
use crate::schema::SchemaError;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Errors produced by adapters. The core never inspects, retries, or
/// suppresses them; they propagate to the caller as-is.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Adapter does not support {0}")]
    Unsupported(&'static str),

    #[error("No adapter registered for: {0}")]
    NoAdapter(String),

    #[error(transparent)]
    RowId(#[from] RowIdError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Adapter failure: {0}")]
    Other(String),
}
