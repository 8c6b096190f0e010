//! Column type descriptors.
//!
//! A `ColumnType` declares everything the planner needs to know about a
//! column: its kind, which filter classes the adapter can apply, whether
//! the data comes back in a natural order, and whether adapter-side
//! filtering is exact or needs a host-side re-check.

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use crate::filters::Operator;
use crate::value::Value;

/// Supported column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    Text,
    /// Boolean
    Bool,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Timestamp
    DateTime,
    /// Binary data
    Blob,
}

impl ColumnKind {
    /// Returns the kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
            ColumnKind::Bool => "bool",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Blob => "blob",
        }
    }

    /// Decodes a constraint literal supplied by the host engine.
    ///
    /// Literals arrive in primitive encodings: ISO-8601 text for temporal
    /// kinds, text or integers for booleans, integers where floats are
    /// expected. `Null` passes through for every kind.
    pub fn parse_literal(&self, value: Value) -> SchemaResult<Value> {
        if value.is_null() {
            return Ok(value);
        }
        match (self, value) {
            (ColumnKind::Int, Value::Int(v)) => Ok(Value::Int(v)),
            (ColumnKind::Float, Value::Float(v)) => Ok(Value::Float(v)),
            (ColumnKind::Float, Value::Int(v)) => Ok(Value::Float(v as f64)),
            (ColumnKind::Text, Value::Text(v)) => Ok(Value::Text(v)),
            (ColumnKind::Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
            (ColumnKind::Bool, Value::Int(v)) => Ok(Value::Bool(v != 0)),
            (ColumnKind::Bool, Value::Text(v)) => parse_bool(&v),
            (ColumnKind::Date, Value::Date(v)) => Ok(Value::Date(v)),
            (ColumnKind::Date, Value::Text(v)) => v
                .parse()
                .map(Value::Date)
                .map_err(|_| SchemaError::invalid_literal(ColumnKind::Date, &v)),
            (ColumnKind::Time, Value::Time(v)) => Ok(Value::Time(v)),
            (ColumnKind::Time, Value::Text(v)) => v
                .parse()
                .map(Value::Time)
                .map_err(|_| SchemaError::invalid_literal(ColumnKind::Time, &v)),
            (ColumnKind::DateTime, Value::DateTime(v)) => Ok(Value::DateTime(v)),
            (ColumnKind::DateTime, Value::Text(v)) => {
                chrono::DateTime::parse_from_rfc3339(&v)
                    .map(|ts| Value::DateTime(ts.with_timezone(&chrono::Utc)))
                    .map_err(|_| SchemaError::invalid_literal(ColumnKind::DateTime, &v))
            }
            (ColumnKind::Blob, Value::Blob(v)) => Ok(Value::Blob(v)),
            (kind, other) => Err(SchemaError::invalid_literal(*kind, &other.to_string())),
        }
    }

    /// Encodes a native value back into its primitive wire form.
    ///
    /// The opposite of `parse_literal`: temporal kinds become ISO-8601
    /// text, everything else passes through.
    pub fn format_literal(&self, value: &Value) -> Value {
        match (self, value) {
            (ColumnKind::Date, Value::Date(v)) => Value::Text(v.to_string()),
            (ColumnKind::Time, Value::Time(v)) => Value::Text(v.to_string()),
            (ColumnKind::DateTime, Value::DateTime(v)) => Value::Text(v.to_rfc3339()),
            _ => value.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> SchemaResult<Value> {
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(Value::Bool(true)),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err(SchemaError::invalid_literal(ColumnKind::Bool, raw)),
    }
}

/// Filter classes an adapter can declare on a column.
///
/// Each class accepts a fixed set of operators; the planner delegates a
/// constraint when some declared class of the column accepts its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterClass {
    /// `== value`
    Equality,
    /// `!= value`
    Inequality,
    /// `LIKE pattern`
    Like,
    /// Bounded or half-bounded interval
    Range,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
}

impl FilterClass {
    /// The operators this class accepts.
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            FilterClass::Equality => &[Operator::Eq],
            FilterClass::Inequality => &[Operator::Ne],
            FilterClass::Like => &[Operator::Like],
            FilterClass::Range => &[
                Operator::Eq,
                Operator::Ge,
                Operator::Gt,
                Operator::Le,
                Operator::Lt,
            ],
            FilterClass::IsNull => &[Operator::IsNull],
            FilterClass::IsNotNull => &[Operator::IsNotNull],
        }
    }

    /// Returns true if the class accepts the operator.
    pub fn accepts(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

/// Natural order of a column's data as produced by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Data comes back sorted ascending.
    Ascending,
    /// Data comes back sorted descending.
    Descending,
    /// Data has no usable order; the host engine must sort.
    None,
    /// The adapter can produce any requested order on demand.
    Any,
}

/// Requested sort direction in an order-by entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The natural order this direction corresponds to.
    pub fn as_order(&self) -> Order {
        match self {
            SortDirection::Asc => Order::Ascending,
            SortDirection::Desc => Order::Descending,
        }
    }
}

/// A column declaration: kind, pushdownable filter classes, natural order,
/// and exactness. After registration only the natural order may change
/// (see [`TableSchema::set_order`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    /// Column kind
    pub kind: ColumnKind,
    /// Filter classes the adapter can apply to this column
    pub filters: Vec<FilterClass>,
    /// Natural order of the data
    pub order: Order,
    /// True if adapter-side filtering is exact (no host re-check needed)
    pub exact: bool,
}

impl ColumnType {
    /// Creates a column with no pushdown capabilities.
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            filters: Vec::new(),
            order: Order::None,
            exact: false,
        }
    }

    /// Declares the filter classes the adapter supports.
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = FilterClass>) -> Self {
        self.filters = filters.into_iter().collect();
        self
    }

    /// Declares the natural order of the data.
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Marks adapter-side filtering as exact.
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Checks that the declared filter classes are consistent with
    /// the column kind. `Like` only applies to text columns.
    pub fn validate(&self) -> SchemaResult<()> {
        for class in &self.filters {
            if *class == FilterClass::Like && self.kind != ColumnKind::Text {
                return Err(SchemaError::InvalidFilterClass {
                    class: *class,
                    kind: self.kind,
                });
            }
        }
        Ok(())
    }

    /// Returns the first declared filter class that accepts the operator,
    /// or `None` when the constraint is not pushdownable.
    pub fn class_for(&self, operator: Operator) -> Option<FilterClass> {
        self.filters.iter().copied().find(|c| c.accepts(operator))
    }

    /// Returns true if the column's natural order already satisfies the
    /// requested direction.
    pub fn satisfies(&self, direction: SortDirection) -> bool {
        self.order == direction.as_order()
    }
}

/// An ordered column registry for one table.
///
/// Column order matters: the planner and the host engine address columns
/// by zero-based index. Built explicitly by the adapter, never discovered
/// by reflection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a column declaration, validating it against its kind.
    pub fn column(mut self, name: impl Into<String>, column: ColumnType) -> SchemaResult<Self> {
        column.validate()?;
        self.columns.push((name.into(), column));
        Ok(self)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a column by zero-based index.
    pub fn by_index(&self, index: usize) -> Option<(&str, &ColumnType)> {
        self.columns
            .get(index)
            .map(|(name, column)| (name.as_str(), column))
    }

    /// Looks up a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column)
    }

    /// Replaces a column's declared natural order. Only the order may
    /// change after registration: adapters that infer it from data keep
    /// it current across mutation.
    pub fn set_order(&mut self, name: &str, order: Order) {
        if let Some((_, column)) = self.columns.iter_mut().find(|(n, _)| n == name) {
            column.order = order;
        }
    }

    /// Iterates columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnType)> {
        self.columns
            .iter()
            .map(|(name, column)| (name.as_str(), column))
    }

    /// Column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }
}
