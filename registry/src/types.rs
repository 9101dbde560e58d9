//! Schema definition types.

use mutcount_core::TableId;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    Bool,
    Int64,
    Float64,
    #[default]
    String,
    Bytes,
    Timestamp,
    /// `ARRAY<STRING>`.
    StringArray,
}

/// Column definition within a table.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub column_type: ColumnType,
    /// Whether this column can be null.
    pub nullable: bool,
    /// Whether the store may fill this column with its commit timestamp.
    pub allow_commit_timestamp: bool,
}

impl ColumnDef {
    /// New nullable column.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            allow_commit_timestamp: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn commit_timestamp(mut self) -> Self {
        self.column_type = ColumnType::Timestamp;
        self.allow_commit_timestamp = true;
        self
    }
}

/// Secondary index definition.
#[derive(Debug, Clone)]
pub struct IndexDef {
    /// Index name (unique across the schema).
    pub name: String,
    /// Ordered key columns. Never empty once built.
    pub key_columns: Vec<String>,
    /// Non-key columns carried in the index (`STORING`).
    pub stored_columns: Vec<String>,
    /// Rows whose key columns are all NULL are left out of the index.
    pub null_filtered: bool,
}

impl IndexDef {
    pub fn new<I, S>(name: impl Into<String>, key_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            stored_columns: Vec::new(),
            null_filtered: false,
        }
    }

    pub fn storing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stored_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn null_filtered(mut self) -> Self {
        self.null_filtered = true;
        self
    }

    /// Key spans more than one column.
    pub fn is_composite(&self) -> bool {
        self.key_columns.len() > 1
    }

    pub fn has_key_column(&self, column: &str) -> bool {
        self.key_columns.iter().any(|c| c == column)
    }

    pub fn has_stored_column(&self, column: &str) -> bool {
        self.stored_columns.iter().any(|c| c == column)
    }

    /// Whether a row has an entry in this index, given a predicate telling
    /// which columns are non-NULL in that row.
    pub fn is_populated(&self, is_set: impl Fn(&str) -> bool) -> bool {
        !self.null_filtered || self.key_columns.iter().any(|c| is_set(c))
    }
}

/// How a column participates in the table's secondary indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnUsage {
    /// Key member of at least one index.
    pub indexed: bool,
    /// Stored by at least one index without being a key member of any.
    pub stored_only: bool,
    /// Key member of at least one composite index.
    pub composite: bool,
}

/// Parent/child interleave relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterleaveDef {
    pub parent: TableId,
    pub child: TableId,
    /// Deleting a parent row deletes the child rows under its key.
    pub on_delete_cascade: bool,
}

/// Table definition.
#[derive(Debug, Clone)]
pub struct TableDef {
    /// Unique identifier.
    pub id: TableId,
    /// Table name.
    pub name: String,
    /// Primary key column names, in key order.
    pub primary_key: Vec<String>,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDef>,
    /// Secondary indexes.
    pub indexes: Vec<IndexDef>,
    /// Parent table when interleaved.
    pub parent: Option<TableId>,
}

impl TableDef {
    /// Get a column definition by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if this table declares a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    pub fn is_key_column(&self, name: &str) -> bool {
        self.primary_key.iter().any(|c| c == name)
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Columns that are neither primary key nor referenced by any index.
    pub fn plain_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| {
            !self.is_key_column(&c.name) && self.column_usage(&c.name) == ColumnUsage::default()
        })
    }

    /// Columns that must be written on insert.
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns
            .iter()
            .filter(|c| !c.nullable || self.is_key_column(&c.name))
    }

    /// Describe how a column participates in the secondary indexes.
    pub fn column_usage(&self, name: &str) -> ColumnUsage {
        let mut usage = ColumnUsage::default();
        let mut stored = false;
        for index in &self.indexes {
            if index.has_key_column(name) {
                usage.indexed = true;
                if index.is_composite() {
                    usage.composite = true;
                }
            } else if index.has_stored_column(name) {
                stored = true;
            }
        }
        usage.stored_only = stored && !usage.indexed;
        usage
    }
}
