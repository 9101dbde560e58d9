//! Logical write operations.

use mutcount_core::{Key, Row, Value};
use mutcount_registry::TableDef;
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a logical write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The non-NULL columns of a stored row.
///
/// Deletes are predicted against an image because NULL-filtered indexes
/// only hold entries for rows with a non-NULL key column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowImage {
    non_null: BTreeSet<String>,
}

impl RowImage {
    /// Image of a row where every non-key column is NULL.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_row(row: &Row) -> Self {
        Self {
            non_null: row
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, _)| k.clone())
                .collect(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.non_null.insert(column.into());
        self
    }

    pub fn is_set(&self, column: &str) -> bool {
        self.non_null.contains(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.non_null.iter().map(String::as_str)
    }
}

/// A child row removed by a cascading parent delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadedRow {
    pub table: String,
    pub image: RowImage,
}

impl CascadedRow {
    pub fn new(table: impl Into<String>, image: RowImage) -> Self {
        Self {
            table: table.into(),
            image,
        }
    }
}

/// One logical write against one row.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperation {
    /// Insert a row. Columns left out are NULL.
    Insert { table: String, values: Row },
    /// Update the written columns of an existing row. `values` carries the
    /// primary key columns plus the touched columns.
    Update { table: String, values: Row },
    /// Delete a row by key.
    Delete {
        table: String,
        key: Key,
        image: RowImage,
        cascade: Vec<CascadedRow>,
    },
}

impl LogicalOperation {
    pub fn insert(table: impl Into<String>, values: Row) -> Self {
        Self::Insert {
            table: table.into(),
            values,
        }
    }

    pub fn update(table: impl Into<String>, values: Row) -> Self {
        Self::Update {
            table: table.into(),
            values,
        }
    }

    /// Delete a row whose non-key columns are assumed NULL and which has no
    /// interleaved children.
    pub fn delete(table: impl Into<String>, key: Key) -> Self {
        Self::Delete {
            table: table.into(),
            key,
            image: RowImage::empty(),
            cascade: Vec::new(),
        }
    }

    /// Set the stored row image assumed by a delete. No-op for writes.
    pub fn with_image(mut self, row_image: RowImage) -> Self {
        if let Self::Delete { image, .. } = &mut self {
            *image = row_image;
        }
        self
    }

    /// Add a cascaded child row to a delete. No-op for writes.
    pub fn cascading(mut self, row: CascadedRow) -> Self {
        if let Self::Delete { cascade, .. } = &mut self {
            cascade.push(row);
        }
        self
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Insert { .. } => OperationKind::Insert,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::Insert { table, .. }
            | Self::Update { table, .. }
            | Self::Delete { table, .. } => table,
        }
    }

    /// Written column values (inserts and updates).
    pub fn values(&self) -> Option<&Row> {
        match self {
            Self::Insert { values, .. } | Self::Update { values, .. } => Some(values),
            Self::Delete { .. } => None,
        }
    }
}

/// Extract the primary key from a row. `None` when a key column is absent
/// or NULL.
pub fn key_of(table: &TableDef, values: &Row) -> Option<Key> {
    table
        .primary_key
        .iter()
        .map(|column| values.get(column).filter(|v| !v.is_null()).cloned())
        .collect::<Option<Vec<Value>>>()
        .map(Key::new)
}
