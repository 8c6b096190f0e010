//! Turns a planner token plus scan-open arguments into adapter inputs.

use std::collections::{BTreeMap, HashMap};

use log::trace;

use crate::filters::{build, Filter, Operator};
use crate::planner::IndexToken;
use crate::schema::{SortDirection, TableSchema};
use crate::value::Value;

use super::errors::{ScanError, ScanResult};

/// Everything an adapter needs to produce rows for one scan: a bounds
/// map plus the order it has been asked to honor.
#[derive(Debug, Clone)]
pub struct ScanSpec {
    pub bounds: HashMap<String, Filter>,
    pub order: Vec<(String, SortDirection)>,
}

impl ScanSpec {
    /// True when some bound can never match, so the scan yields no rows
    /// and the adapter need not be called at all.
    pub fn is_impossible(&self) -> bool {
        self.bounds.values().any(Filter::is_impossible)
    }
}

/// Reconstructs the planner's decisions at scan open.
///
/// The token's accepted constraints are zipped against the literal
/// arguments in argument-slot order, each literal parsed with its
/// column's kind codec, and the per-column operations folded into one
/// `Filter` via the single declared filter class that covers every
/// operator seen. Failing to find such a class means the plan and the
/// scan arguments disagree; that is a bug, not data, and the scan
/// fails fast rather than silently dropping a predicate.
pub fn materialize(
    schema: &TableSchema,
    token: &IndexToken,
    args: &[Value],
) -> ScanResult<ScanSpec> {
    if token.constraints.len() != args.len() {
        return Err(ScanError::ArgumentCount {
            expected: token.constraints.len(),
            got: args.len(),
        });
    }

    // group parsed (operator, literal) pairs per column, deduplicated
    let mut per_column: BTreeMap<usize, Vec<(Operator, Value)>> = BTreeMap::new();
    for (&(column_index, operator), literal) in token.constraints.iter().zip(args) {
        let (_, column) = schema
            .by_index(column_index)
            .ok_or(ScanError::UnknownColumnIndex(column_index))?;
        let parsed = column.kind.parse_literal(literal.clone())?;
        let operations = per_column.entry(column_index).or_default();
        if !operations.contains(&(operator, parsed.clone())) {
            operations.push((operator, parsed));
        }
    }

    let mut bounds = HashMap::new();
    for (column_index, operations) in per_column {
        let (name, column) = schema
            .by_index(column_index)
            .ok_or(ScanError::UnknownColumnIndex(column_index))?;
        let class = column
            .filters
            .iter()
            .copied()
            .find(|class| operations.iter().all(|&(op, _)| class.accepts(op)))
            .ok_or_else(|| ScanError::NoFilterClass {
                column: name.to_string(),
                operators: operations.iter().map(|&(op, _)| op).collect(),
            })?;
        let filter = build(class, &operations)?;
        trace!("Bound on {name}: {filter}");
        bounds.insert(name.to_string(), filter);
    }

    let mut order = Vec::with_capacity(token.deferred_order.len());
    for &(column_index, descending) in &token.deferred_order {
        let (name, _) = schema
            .by_index(column_index)
            .ok_or(ScanError::UnknownColumnIndex(column_index))?;
        let direction = if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        order.push((name.to_string(), direction));
    }

    Ok(ScanSpec { bounds, order })
}
