//! Touched-column shapes.

use mutcount_core::{Row, Value};
use mutcount_registry::{ColumnDef, ColumnType, TableDef};

/// The non-key columns every generated row writes, with their values.
///
/// A shape is the same for every unit of a batch, so every unit costs the
/// same. Columns may be written as NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowShape {
    columns: Row,
}

impl RowShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `value` into `column`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Write NULL into `column`.
    pub fn null(mut self, column: impl Into<String>) -> Self {
        self.columns.insert(column.into(), Value::Null);
        self
    }

    /// Write the type placeholder into every listed column of `table`.
    /// Unknown columns are written as empty strings so the calculator can
    /// report them.
    pub fn placeholders<I, S>(mut self, table: &TableDef, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            let column = column.into();
            let value = table
                .get_column(&column)
                .map(placeholder)
                .unwrap_or_else(|| Value::from(""));
            self.columns.insert(column, value);
        }
        self
    }

    /// Write the first `count` columns named `{prefix}1`, `{prefix}2`, ...
    /// with empty strings.
    pub fn numbered(mut self, prefix: &str, count: usize) -> Self {
        for i in 1..=count {
            self.columns.insert(format!("{prefix}{i}"), Value::from(""));
        }
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The shape's columns laid over `base`.
    pub fn apply_to(&self, mut base: Row) -> Row {
        base.extend(self.columns.iter().map(|(k, v)| (k.clone(), v.clone())));
        base
    }
}

/// A value that satisfies a column's type and nullability.
///
/// Commit-timestamp columns get the commit timestamp placeholder.
pub fn placeholder(column: &ColumnDef) -> Value {
    if column.allow_commit_timestamp {
        return Value::CommitTimestamp;
    }
    match column.column_type {
        ColumnType::Bool => Value::Bool(false),
        ColumnType::Int64 => Value::Int(0),
        ColumnType::Float64 => Value::Float(0.0),
        ColumnType::String => Value::String(String::new()),
        ColumnType::Bytes => Value::Bytes(Vec::new()),
        ColumnType::Timestamp => Value::Timestamp(0),
        ColumnType::StringArray => Value::List(Vec::new()),
    }
}
