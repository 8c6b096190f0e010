//! Planner errors

use thiserror::Error;

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Planner errors. All variants are contract violations between the host
/// engine and this crate, fatal for the current scan.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Unknown column index: {0}")]
    UnknownColumn(usize),

    #[error("Unsupported scan token version {found} (expected {expected})")]
    TokenVersion { found: u32, expected: u32 },

    #[error("Malformed scan token: {0}")]
    TokenEncoding(#[from] serde_json::Error),
}
