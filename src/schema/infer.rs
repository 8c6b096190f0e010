//! Schema and order inference from sampled rows.
//!
//! Adapters with dynamic schemas scan a prefix of their data at
//! construction time to determine each column's kind and whether the data
//! happens to arrive sorted. Kinds widen monotonically (`Bool`/`Int` →
//! `Float` → `Text`, text absorbing); an established order collapses to
//! `None` on the first violation and never recovers within a pass.

use std::collections::HashMap;

use super::types::{ColumnKind, Order};
use crate::adapter::Row;
use crate::value::Value;

/// Result of analyzing a row stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    /// Number of rows consumed
    pub num_rows: usize,
    /// Detected natural order per column
    pub orders: HashMap<String, Order>,
    /// Widened kind per column
    pub kinds: HashMap<String, ColumnKind>,
}

/// Computes row count, per-column order, and per-column kind from a
/// stream of rows.
pub fn analyze(rows: impl IntoIterator<Item = Row>) -> Inference {
    let mut orders: HashMap<String, Order> = HashMap::new();
    let mut kinds: HashMap<String, ColumnKind> = HashMap::new();

    let mut previous: Option<Row> = None;
    let mut num_rows = 0;

    for row in rows {
        num_rows += 1;
        for (column_name, value) in &row.values {
            if num_rows > 1 {
                let prev_value = previous.as_ref().and_then(|p| p.values.get(column_name));
                let current = orders
                    .get(column_name)
                    .copied()
                    .unwrap_or(Order::None);
                orders.insert(
                    column_name.clone(),
                    update_order(current, prev_value, value, num_rows),
                );
            }
            widen_kind(&mut kinds, column_name, value);
        }
        previous = Some(row);
    }

    // a single row has columns but no detectable order
    if let Some(row) = &previous {
        for column_name in row.values.keys() {
            orders.entry(column_name.clone()).or_insert(Order::None);
        }
    }

    Inference {
        num_rows,
        orders,
        kinds,
    }
}

/// Updates the running order of a column given the previous and current
/// values.
///
/// Exactly the second row establishes a direction; after that any
/// violation (or an incomparable pair) collapses the order to `None`.
pub fn update_order(
    current_order: Order,
    previous: Option<&Value>,
    current: &Value,
    num_rows: usize,
) -> Order {
    let previous = match previous {
        Some(v) if !v.is_null() => v,
        _ => return Order::None,
    };
    if num_rows < 2 {
        return Order::None;
    }

    let cmp = match current.partial_cmp(previous) {
        Some(ordering) => ordering,
        None => return Order::None,
    };

    if num_rows == 2 {
        return if cmp.is_ge() {
            Order::Ascending
        } else {
            Order::Descending
        };
    }

    match current_order {
        Order::Ascending if cmp.is_lt() => Order::None,
        Order::Descending if cmp.is_gt() => Order::None,
        Order::None => Order::None,
        order => order,
    }
}

fn widen_kind(kinds: &mut HashMap<String, ColumnKind>, column_name: &str, value: &Value) {
    let seen = kinds.get(column_name).copied();
    if seen == Some(ColumnKind::Text) {
        return;
    }
    let widened = match value {
        Value::Text(_) | Value::Blob(_) => ColumnKind::Text,
        _ if seen == Some(ColumnKind::Float) => return,
        Value::Float(_) => ColumnKind::Float,
        _ if seen == Some(ColumnKind::Int) => return,
        Value::Int(_) => ColumnKind::Int,
        _ if seen == Some(ColumnKind::Bool) => return,
        Value::Bool(_) => ColumnKind::Bool,
        Value::Date(_) => ColumnKind::Date,
        Value::Time(_) => ColumnKind::Time,
        Value::DateTime(_) => ColumnKind::DateTime,
        // nulls carry no kind information
        Value::Null => return,
    };
    kinds.insert(column_name.to_string(), widened);
}
