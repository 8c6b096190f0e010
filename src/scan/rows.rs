//! Row-level application of a bounds map, for adapters whose source has
//! no query capability of its own (in-memory stores, flat files).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::adapter::{Row, ScanOptions};
use crate::filters::Filter;
use crate::schema::SortDirection;
use crate::value::Value;

/// Compares two cells for sorting. Missing values and `NULL` sort
/// first; incomparable pairs keep their relative order.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

/// Filters, sorts, paginates, and projects a row sequence.
///
/// Multi-key sorts treat the first `order` entry as the primary key.
/// A row fails a bound when the column is missing, except for `IS NULL`
/// (a missing cell is null for filtering purposes).
pub fn filter_rows(
    rows: impl IntoIterator<Item = Row>,
    bounds: &HashMap<String, Filter>,
    order: &[(String, SortDirection)],
    options: &ScanOptions,
) -> Vec<Row> {
    let mut rows: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            bounds.iter().all(|(column, filter)| {
                filter.check(row.get(column).unwrap_or(&Value::Null))
            })
        })
        .collect();

    // stable sorts applied from the least significant key up, so the
    // first listed key decides ties last and ends up primary
    for (column, direction) in order.iter().rev() {
        rows.sort_by(|a, b| {
            let ordering = compare_cells(a.get(column), b.get(column));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    if let Some(offset) = options.offset {
        rows.drain(..offset.min(rows.len()));
    }
    if let Some(limit) = options.limit {
        rows.truncate(limit);
    }

    if let Some(requested) = &options.requested_columns {
        for row in &mut rows {
            row.values.retain(|column, _| requested.iter().any(|r| r == column));
        }
    }

    rows
}
