//! SchemaBuilder for constructing an immutable Schema.

use crate::{ColumnDef, IndexDef, InterleaveDef, Schema, TableDef};
use mutcount_core::TableId;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur during schema construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate table name: {0}")]
    DuplicateTableName(String),

    #[error("Duplicate column {column} on table {table}")]
    DuplicateColumn { table: String, column: String },

    #[error("Duplicate index name: {0}")]
    DuplicateIndexName(String),

    #[error("Table {0} has no primary key")]
    MissingPrimaryKey(String),

    #[error("Primary key column {column} is not declared on table {table}")]
    UnknownKeyColumn { table: String, column: String },

    #[error("Index {0} has no key columns")]
    EmptyIndexKey(String),

    #[error("Index {index} references undeclared column {column}")]
    UnknownIndexColumn { index: String, column: String },

    #[error("Index {index} stores its own key column {column}")]
    StoredKeyOverlap { index: String, column: String },

    #[error("Unknown parent table: {0}")]
    UnknownParentTable(String),

    #[error("Primary key of {child} does not start with the primary key of {parent}")]
    KeyNotPrefixed { child: String, parent: String },
}

/// Builder for constructing an immutable Schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    /// Next table ID to allocate.
    next_table_id: u32,

    /// Tables being built.
    tables: HashMap<TableId, TableDef>,
    /// Table name to ID mapping.
    table_names: HashMap<String, TableId>,
    /// Index names across all tables.
    index_names: HashSet<String>,

    /// Interleave relationships being built.
    interleaves: Vec<InterleaveDef>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table definition.
    pub fn add_table(&mut self, name: impl Into<String>) -> TableBuilder<'_> {
        let name = name.into();
        let id = TableId::new(self.next_table_id);
        self.next_table_id += 1;

        TableBuilder {
            builder: self,
            id,
            name,
            primary_key: Vec::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
            parent_name: None,
        }
    }

    /// Build the immutable Schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        Ok(Schema::new(self.tables, self.table_names, self.interleaves))
    }
}

/// Builder for a table definition.
pub struct TableBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    id: TableId,
    name: String,
    primary_key: Vec<String>,
    columns: Vec<ColumnDef>,
    indexes: Vec<IndexDef>,
    parent_name: Option<String>,
}

impl<'a> TableBuilder<'a> {
    /// Set the primary key columns, in key order.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a column.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Add several columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Add a secondary index.
    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Interleave this table in a previously added parent table.
    pub fn interleave_in(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    /// Finish building this table.
    pub fn done(self) -> Result<TableId, SchemaError> {
        // Check for duplicate name
        if self.builder.table_names.contains_key(&self.name) {
            return Err(SchemaError::DuplicateTableName(self.name));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        if self.primary_key.is_empty() {
            return Err(SchemaError::MissingPrimaryKey(self.name));
        }
        for key in &self.primary_key {
            if !seen.contains(key.as_str()) {
                return Err(SchemaError::UnknownKeyColumn {
                    table: self.name.clone(),
                    column: key.clone(),
                });
            }
        }

        let mut index_names = HashSet::new();
        for index in &self.indexes {
            validate_index(index, &seen)?;
            if self.builder.index_names.contains(&index.name)
                || !index_names.insert(index.name.clone())
            {
                return Err(SchemaError::DuplicateIndexName(index.name.clone()));
            }
        }

        // Resolve parent and check the key prefix
        let parent = match &self.parent_name {
            Some(parent_name) => {
                let parent_id = self
                    .builder
                    .table_names
                    .get(parent_name)
                    .copied()
                    .ok_or_else(|| SchemaError::UnknownParentTable(parent_name.clone()))?;
                let parent_key = self
                    .builder
                    .tables
                    .get(&parent_id)
                    .map(|p| p.primary_key.as_slice())
                    .unwrap_or_default();
                if !self.primary_key.starts_with(parent_key)
                    || self.primary_key.len() <= parent_key.len()
                {
                    return Err(SchemaError::KeyNotPrefixed {
                        child: self.name,
                        parent: parent_name.clone(),
                    });
                }
                Some(parent_id)
            }
            None => None,
        };

        let table_def = TableDef {
            id: self.id,
            name: self.name.clone(),
            primary_key: self.primary_key,
            columns: self.columns,
            indexes: self.indexes,
            parent,
        };

        if let Some(parent_id) = parent {
            self.builder.interleaves.push(InterleaveDef {
                parent: parent_id,
                child: self.id,
                on_delete_cascade: true,
            });
        }
        self.builder.index_names.extend(index_names);
        self.builder.table_names.insert(self.name, self.id);
        self.builder.tables.insert(self.id, table_def);

        Ok(self.id)
    }
}

fn validate_index(index: &IndexDef, declared: &HashSet<&str>) -> Result<(), SchemaError> {
    if index.key_columns.is_empty() {
        return Err(SchemaError::EmptyIndexKey(index.name.clone()));
    }
    for column in index.key_columns.iter().chain(&index.stored_columns) {
        if !declared.contains(column.as_str()) {
            return Err(SchemaError::UnknownIndexColumn {
                index: index.name.clone(),
                column: column.clone(),
            });
        }
    }
    if let Some(column) = index
        .stored_columns
        .iter()
        .find(|c| index.has_key_column(c))
    {
        return Err(SchemaError::StoredKeyOverlap {
            index: index.name.clone(),
            column: column.clone(),
        });
    }
    Ok(())
}
