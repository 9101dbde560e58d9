//! The Schema - immutable table lookup.

use crate::{InterleaveDef, TableDef};
use mutcount_core::TableId;
use std::collections::HashMap;

/// The Schema provides lookup of table definitions and interleave
/// relationships. It is immutable after construction.
#[derive(Debug, Default)]
pub struct Schema {
    /// Table definitions by ID.
    tables: HashMap<TableId, TableDef>,
    /// Table ID lookup by name.
    table_names: HashMap<String, TableId>,

    /// Interleave relationships, one per child table.
    interleaves: Vec<InterleaveDef>,
    /// Direct children indexed by parent table ID.
    children_by_parent: HashMap<TableId, Vec<TableId>>,
}

impl Schema {
    /// Use SchemaBuilder for construction.
    pub(crate) fn new(
        tables: HashMap<TableId, TableDef>,
        table_names: HashMap<String, TableId>,
        interleaves: Vec<InterleaveDef>,
    ) -> Self {
        let mut children_by_parent: HashMap<TableId, Vec<TableId>> = HashMap::new();
        for rel in &interleaves {
            children_by_parent
                .entry(rel.parent)
                .or_default()
                .push(rel.child);
        }
        for children in children_by_parent.values_mut() {
            children.sort();
        }

        Self {
            tables,
            table_names,
            interleaves,
            children_by_parent,
        }
    }

    // ==================== Table Lookups ====================

    /// Get a table definition by name.
    pub fn get_table_by_name(&self, name: &str) -> Option<&TableDef> {
        self.table_names.get(name).and_then(|id| self.tables.get(id))
    }

    /// Get a table ID by name.
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        self.table_names.get(name).copied()
    }

    /// Get the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    // ==================== Interleave Queries ====================

    /// Get the parent table of an interleaved table.
    pub fn parent_of(&self, id: TableId) -> Option<&TableDef> {
        self.tables
            .get(&id)
            .and_then(|t| t.parent)
            .and_then(|parent| self.tables.get(&parent))
    }

    /// Get the tables directly interleaved in `id`.
    pub fn children_of(&self, id: TableId) -> impl Iterator<Item = &TableDef> + '_ {
        self.children_by_parent
            .get(&id)
            .into_iter()
            .flat_map(|ids| ids.iter().filter_map(|c| self.tables.get(c)))
    }

    /// Check whether `child` is directly interleaved in `parent`.
    pub fn is_child_of(&self, child: TableId, parent: TableId) -> bool {
        self.children_by_parent
            .get(&parent)
            .map(|ids| ids.contains(&child))
            .unwrap_or(false)
    }

    /// Get the interleave relationship for a child table.
    pub fn interleave_of(&self, child: TableId) -> Option<&InterleaveDef> {
        self.interleaves.iter().find(|rel| rel.child == child)
    }
}
