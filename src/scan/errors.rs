//! Scan errors

use thiserror::Error;

use crate::adapter::AdapterError;
use crate::filters::{FilterError, Operator};
use crate::schema::SchemaError;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised between token decode and row production. The contract
/// variants mean the plan and the scan arguments disagree; they are
/// fatal for the current scan and never retried.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan token carries {expected} constraints but {got} arguments were supplied")]
    ArgumentCount { expected: usize, got: usize },

    #[error("No filter class on column {column} covers operators {operators:?}")]
    NoFilterClass {
        column: String,
        operators: Vec<Operator>,
    },

    #[error("Scan token references unknown column index {0}")]
    UnknownColumnIndex(usize),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
