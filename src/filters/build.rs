//! Reduction of operator/value multisets into canonical filters.

use super::endpoint::{Endpoint, Side};
use super::errors::{FilterError, FilterResult};
use super::{Filter, LikePattern, Operator};
use crate::schema::FilterClass;
use crate::value::Value;

/// Builds the canonical filter for one column from the operations routed
/// to a filter class.
///
/// The operations must all be accepted by `class` — the planner only
/// delegates constraints a declared class accepts, so anything else is a
/// contract violation surfaced as an error, not a data condition.
pub fn build(class: FilterClass, operations: &[(Operator, Value)]) -> FilterResult<Filter> {
    match class {
        FilterClass::Equality => build_single_value(class, operations, Filter::Equal),
        FilterClass::Inequality => build_single_value(class, operations, Filter::NotEqual),
        FilterClass::Like => build_like(operations),
        FilterClass::Range => build_range(operations),
        FilterClass::IsNull => Ok(Filter::IsNull),
        FilterClass::IsNotNull => Ok(Filter::IsNotNull),
    }
}

/// Equality and inequality accept exactly one distinct value; a column
/// cannot equal two different literals at once, and a conjunction of two
/// different exclusions is not representable as a single pushdown filter,
/// so both collapse to `Impossible`.
fn build_single_value(
    class: FilterClass,
    operations: &[(Operator, Value)],
    constructor: impl Fn(Value) -> Filter,
) -> FilterResult<Filter> {
    let mut distinct: Option<&Value> = None;
    for (operator, value) in operations {
        if !class.accepts(*operator) {
            return Err(FilterError::InvalidOperator {
                class,
                operator: *operator,
            });
        }
        match distinct {
            None => distinct = Some(value),
            Some(seen) if seen == value => {}
            Some(_) => return Ok(Filter::Impossible),
        }
    }
    match distinct {
        Some(value) => Ok(constructor(value.clone())),
        None => Ok(Filter::Impossible),
    }
}

fn build_like(operations: &[(Operator, Value)]) -> FilterResult<Filter> {
    let mut distinct: Option<&Value> = None;
    for (operator, value) in operations {
        if *operator != Operator::Like {
            return Err(FilterError::InvalidOperator {
                class: FilterClass::Like,
                operator: *operator,
            });
        }
        match distinct {
            None => distinct = Some(value),
            Some(seen) if seen == value => {}
            // only a single pattern is supported
            Some(_) => return Ok(Filter::Impossible),
        }
    }
    match distinct {
        Some(Value::Text(pattern)) => Ok(Filter::Like(LikePattern::new(pattern.clone())?)),
        Some(other) => Err(FilterError::InvalidPattern {
            pattern: other.to_string(),
            reason: "LIKE patterns must be text".to_string(),
        }),
        None => Ok(Filter::Impossible),
    }
}

/// Folds comparison operators into a single running range, keeping the
/// tighter bound at each step and short-circuiting to `Impossible` as
/// soon as the interval empties.
fn build_range(operations: &[(Operator, Value)]) -> FilterResult<Filter> {
    let mut start = Endpoint::unbounded(Side::Left);
    let mut end = Endpoint::unbounded(Side::Right);

    for (operator, value) in operations {
        let (new_start, new_end) = endpoints_for(*operator, value)?;

        start = start.max(new_start);
        end = end.min(new_end);

        if start.is_after(&end) {
            return Ok(Filter::Impossible);
        }
    }

    Ok(Filter::Range {
        start: start.value,
        end: end.value,
        include_start: start.include,
        include_end: end.include,
    })
}

fn endpoints_for(operator: Operator, value: &Value) -> FilterResult<(Endpoint, Endpoint)> {
    let bound = |include| Endpoint::new(Some(value.clone()), include, Side::Left);
    let upper = |include| Endpoint::new(Some(value.clone()), include, Side::Right);

    match operator {
        Operator::Eq => Ok((bound(true), upper(true))),
        Operator::Ge => Ok((bound(true), Endpoint::unbounded(Side::Right))),
        Operator::Gt => Ok((bound(false), Endpoint::unbounded(Side::Right))),
        Operator::Le => Ok((Endpoint::unbounded(Side::Left), upper(true))),
        Operator::Lt => Ok((Endpoint::unbounded(Side::Left), upper(false))),
        other => Err(FilterError::InvalidOperator {
            class: FilterClass::Range,
            operator: other,
        }),
    }
}

/// Intersects two filters built independently for the same column.
///
/// Only ranges can be intersected; `Impossible` absorbs. Handing anything
/// else to this function is a type error on the caller's side.
pub fn intersect(a: &Filter, b: &Filter) -> FilterResult<Filter> {
    if a.is_impossible() || b.is_impossible() {
        return Ok(Filter::Impossible);
    }

    let (start_a, end_a) = range_endpoints(a)?;
    let (start_b, end_b) = range_endpoints(b)?;

    let start = start_a.max(start_b);
    let end = end_a.min(end_b);

    if start.is_after(&end) {
        return Ok(Filter::Impossible);
    }

    Ok(Filter::Range {
        start: start.value,
        end: end.value,
        include_start: start.include,
        include_end: end.include,
    })
}

fn range_endpoints(filter: &Filter) -> FilterResult<(Endpoint, Endpoint)> {
    match filter {
        Filter::Range {
            start,
            end,
            include_start,
            include_end,
        } => Ok((
            Endpoint::new(start.clone(), *include_start, Side::Left),
            Endpoint::new(end.clone(), *include_end, Side::Right),
        )),
        other => Err(FilterError::NotARange {
            found: other.to_string(),
        }),
    }
}
