//! Schema errors

use thiserror::Error;

use super::types::{ColumnKind, FilterClass};

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Filter class {class:?} is not valid for {} columns", kind.kind_name())]
    InvalidFilterClass {
        class: FilterClass,
        kind: ColumnKind,
    },

    #[error("Cannot parse {literal:?} as {}", kind.kind_name())]
    InvalidLiteral { kind: ColumnKind, literal: String },
}

impl SchemaError {
    /// Create an invalid literal error
    pub fn invalid_literal(kind: ColumnKind, literal: &str) -> Self {
        Self::InvalidLiteral {
            kind,
            literal: literal.to_string(),
        }
    }
}
