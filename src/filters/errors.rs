//! Filter algebra errors

use thiserror::Error;

use super::Operator;
use crate::schema::FilterClass;

/// Result type for filter construction
pub type FilterResult<T> = Result<T, FilterError>;

/// Filter algebra errors.
///
/// These are programming-contract failures: they mean the planner and the
/// materializer disagree about which operators a filter class accepts,
/// not that the data is unsatisfiable (that is `Filter::Impossible`, a
/// normal value).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    #[error("Operator {operator:?} is not valid for filter class {class:?}")]
    InvalidOperator {
        class: FilterClass,
        operator: Operator,
    },

    #[error("Cannot intersect {found} with a range filter")]
    NotARange { found: String },

    #[error("Invalid LIKE pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
