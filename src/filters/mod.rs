//! Filter algebra for SQL predicates.
//!
//! A scan receives an unordered multiset of `(operator, value)` pairs per
//! column and reduces it to exactly one `Filter`. Impossible conjunctions
//! (a column equal to two different literals, an empty range) collapse to
//! `Filter::Impossible`, a normal value meaning "no row can match" —
//! never an error.
//!
//! # Design Principles
//!
//! - `Filter` is a closed tagged union; each filter class maps to a fixed
//!   operator set (`FilterClass::operators`)
//! - Filters are built once per scan and immutable afterwards
//! - `Impossible` is absorbing under every combination

mod build;
mod endpoint;
mod errors;

pub use build::{build, intersect};
pub use errors::{FilterError, FilterResult};

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparison operators surfaced by the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// SQL spelling, for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled `LIKE` pattern.
///
/// `%` matches any run of characters and `_` matches a single character;
/// everything else is literal. Matching is case-insensitive and anchored,
/// as in the SQL `LIKE` it mirrors. Equality is on the pattern text.
#[derive(Debug, Clone)]
pub struct LikePattern {
    pattern: String,
    regex: Regex,
}

impl LikePattern {
    /// Compiles a `LIKE` pattern.
    pub fn new(pattern: impl Into<String>) -> FilterResult<Self> {
        let pattern = pattern.into();
        let mut translated = String::with_capacity(pattern.len() + 8);
        translated.push_str("(?i)^");
        for ch in pattern.chars() {
            match ch {
                '%' => translated.push_str(".*"),
                '_' => translated.push('.'),
                other => translated.push_str(&regex::escape(&other.to_string())),
            }
        }
        translated.push('$');

        let regex = Regex::new(&translated).map_err(|err| FilterError::InvalidPattern {
            pattern: pattern.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self { pattern, regex })
    }

    /// The original pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the text matches the pattern.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for LikePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// A canonical single-column filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column == value`
    Equal(Value),
    /// `column != value`
    NotEqual(Value),
    /// `column LIKE pattern`
    Like(LikePattern),
    /// `start <op> column <op> end`, either side optionally unbounded
    Range {
        start: Option<Value>,
        end: Option<Value>,
        include_start: bool,
        include_end: bool,
    },
    /// `column IS NULL`
    IsNull,
    /// `column IS NOT NULL`
    IsNotNull,
    /// No row can satisfy this column's constraints.
    Impossible,
}

impl Filter {
    /// Convenience constructor for a range filter.
    pub fn range(
        start: Option<Value>,
        end: Option<Value>,
        include_start: bool,
        include_end: bool,
    ) -> Self {
        Filter::Range {
            start,
            end,
            include_start,
            include_end,
        }
    }

    /// Tests a value against the filter, for host-side re-checks of
    /// non-exact columns.
    ///
    /// `Impossible` rejects everything. Ordered comparisons against an
    /// incomparable value reject the row.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Filter::Equal(expected) => value == expected,
            Filter::NotEqual(expected) => value != expected,
            Filter::Like(pattern) => match value {
                Value::Text(text) => pattern.matches(text),
                _ => false,
            },
            Filter::Range {
                start,
                end,
                include_start,
                include_end,
            } => {
                if let Some(start) = start {
                    match value.partial_cmp(start) {
                        Some(ordering) => {
                            if ordering.is_lt() || (!include_start && ordering.is_eq()) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
                if let Some(end) = end {
                    match value.partial_cmp(end) {
                        Some(ordering) => {
                            if ordering.is_gt() || (!include_end && ordering.is_eq()) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
                true
            }
            Filter::IsNull => value.is_null(),
            Filter::IsNotNull => !value.is_null(),
            Filter::Impossible => false,
        }
    }

    /// Returns true for `Impossible`.
    pub fn is_impossible(&self) -> bool {
        matches!(self, Filter::Impossible)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equal(value) => write!(f, "=={}", value),
            Filter::NotEqual(value) => write!(f, "!={}", value),
            Filter::Like(pattern) => write!(f, "LIKE {}", pattern.pattern()),
            Filter::Range {
                start,
                end,
                include_start,
                include_end,
            } => {
                // a closed point range reads as equality
                if let (Some(point), Some(end)) = (start, end) {
                    if point == end && *include_start && *include_end {
                        return write!(f, "=={}", point);
                    }
                }
                if start.is_none() && end.is_none() {
                    return write!(f, "-∞,∞");
                }
                let mut parts = Vec::new();
                if let Some(start) = start {
                    let op = if *include_start { ">=" } else { ">" };
                    parts.push(format!("{}{}", op, start));
                }
                if let Some(end) = end {
                    let op = if *include_end { "<=" } else { "<" };
                    parts.push(format!("{}{}", op, end));
                }
                write!(f, "{}", parts.join(","))
            }
            Filter::IsNull => write!(f, "IS NULL"),
            Filter::IsNotNull => write!(f, "IS NOT NULL"),
            Filter::Impossible => write!(f, "1 = 0"),
        }
    }
}
